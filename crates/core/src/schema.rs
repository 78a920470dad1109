//! 문서 스키마 — NVD CVE 레코드의 고정 타입 표현
//!
//! 각 CVE 레코드는 미리 선언된 스키마 노드 트리로 표현됩니다.
//! 모든 필드는 부재 가능하므로 `Option`으로 선언하며, 값이 없는 필드는
//! [`Value::Absent`] 센티널로 노출됩니다. 동적 키 맵 대신 태그된 구조체를
//! 사용하므로 경로는 예측 가능하고 오타는 [`QueryError::AttributeNotFound`]로
//! 드러납니다.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::paths;
use crate::value::Value;

/// 스키마 노드 공통 trait
///
/// 노드는 선언 순서가 보존된 (필드명, 값) 목록으로 자신을 드러냅니다.
/// `field`가 `None`을 반환하면 미선언 필드, `Some(Value::Absent)`를
/// 반환하면 선언되었으나 값이 없는 필드입니다.
pub trait Node {
    /// 선언 순서대로 (필드명, 값) 쌍을 반환합니다.
    fn entries(&self) -> Vec<(&'static str, Value)>;

    /// 선언된 필드의 값을 조회합니다. 미선언 필드는 `None`.
    fn field(&self, name: &str) -> Option<Value> {
        self.entries()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// 노드를 [`Value`] 트리로 변환합니다.
    fn to_value(&self) -> Value {
        Value::Map(
            self.entries()
                .into_iter()
                .map(|(key, value)| (key.to_owned(), value))
                .collect(),
        )
    }
}

fn node_value<N: Node>(node: Option<&N>) -> Value {
    node.map(Node::to_value).unwrap_or(Value::Absent)
}

fn node_list<N: Node>(nodes: &[N]) -> Value {
    Value::List(nodes.iter().map(Node::to_value).collect())
}

/// CVE 문서 — 원본 레코드 하나를 감싸는 최상위 노드
///
/// 적재 시점에 생성되며 이후 변경되지 않습니다. `project`와 `pretty`는
/// 파생 뷰만 만들 뿐 원본을 수정하지 않습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// CVE 식별자 (`CVE-YYYY-NNNN`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_: Option<String>,
    /// CVE 상세 정보
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cve: Option<Cve>,
    /// 영향을 받는 CPE 구성
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configurations: Option<Configurations>,
    /// 심각도 및 CVSS 점수
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact: Option<Impact>,
    /// 공개 시각 (UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_date: Option<NaiveDateTime>,
    /// 최종 수정 시각 (UTC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_date: Option<NaiveDateTime>,
}

impl Node for Document {
    fn entries(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id_", self.id_.clone().into()),
            ("cve", node_value(self.cve.as_ref())),
            ("configurations", node_value(self.configurations.as_ref())),
            ("impact", node_value(self.impact.as_ref())),
            ("published_date", self.published_date.into()),
            ("modified_date", self.modified_date.into()),
        ]
    }
}

impl Document {
    /// 선언된 속성을 점 구분 경로로 조회합니다.
    ///
    /// 첫 세그먼트가 스키마에 없으면 [`QueryError::AttributeNotFound`]를
    /// 반환합니다. 선언된 경로의 하위가 비어 있으면 에러 없이
    /// [`Value::Absent`]를 반환합니다.
    pub fn attr(&self, path: &str) -> Result<Value, QueryError> {
        let head = path.split('.').next().unwrap_or(path);
        if self.field(head).is_none() {
            return Err(QueryError::AttributeNotFound {
                path: path.to_owned(),
            });
        }
        Ok(paths::resolve(self, path))
    }

    /// 존재하는 필드만 선언 순서대로 렌더링합니다.
    pub fn pretty(&self) -> String {
        self.to_value().to_pretty()
    }

    /// 부재 필드를 생략한 JSON 표현을 만듭니다.
    pub fn to_json(&self) -> serde_json::Value {
        self.to_value().to_json()
    }
}

/// CVE 상세 노드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cve {
    /// CVE 식별자
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_: Option<String>,
    /// 할당 기관 (예: `cve@mitre.org`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigner: Option<String>,
    /// CVE 데이터 포맷 버전
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_version: Option<String>,
    /// 식별자에서 파싱한 연도
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    /// 영향받는 제품 목록
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affects: Option<Affects>,
    /// 참고 자료 목록
    #[serde(skip_serializing_if = "Option::is_none")]
    pub references: Option<References>,
    /// 설명 목록
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descriptions: Option<Descriptions>,
}

impl Node for Cve {
    fn entries(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id_", self.id_.clone().into()),
            ("assigner", self.assigner.clone().into()),
            ("data_version", self.data_version.clone().into()),
            ("year", self.year.into()),
            ("affects", node_value(self.affects.as_ref())),
            ("references", node_value(self.references.as_ref())),
            ("descriptions", node_value(self.descriptions.as_ref())),
        ]
    }
}

/// 영향받는 제품을 감싸는 엔트리 노드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Affects {
    /// 제품 노드 목록
    #[serde(default)]
    pub data: Vec<Product>,
}

impl Node for Affects {
    fn entries(&self) -> Vec<(&'static str, Value)> {
        vec![("data", node_list(&self.data))]
    }
}

/// 벤더-제품-버전 조합
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// 벤더명
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    /// 제품명
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    /// 영향받는 버전 문자열 목록
    #[serde(default)]
    pub versions: Vec<String>,
}

impl Node for Product {
    fn entries(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("vendor_name", self.vendor_name.clone().into()),
            ("product_name", self.product_name.clone().into()),
            ("versions", self.versions.clone().into()),
        ]
    }
}

/// 참고 자료를 감싸는 엔트리 노드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct References {
    /// 참고 자료 노드 목록
    #[serde(default)]
    pub data: Vec<Reference>,
}

impl Node for References {
    fn entries(&self) -> Vec<(&'static str, Value)> {
        vec![("data", node_list(&self.data))]
    }
}

/// 참고 자료 하나 (URL, 이름, 출처)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    /// 자료 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// 자료 이름
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 출처 태그 (예: `REDHAT`, `MISC`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refsource: Option<String>,
}

impl Node for Reference {
    fn entries(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("url", self.url.clone().into()),
            ("name", self.name.clone().into()),
            ("refsource", self.refsource.clone().into()),
        ]
    }
}

/// 설명을 감싸는 엔트리 노드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Descriptions {
    /// 설명 노드 목록
    #[serde(default)]
    pub data: Vec<Description>,
}

impl Node for Descriptions {
    fn entries(&self) -> Vec<(&'static str, Value)> {
        vec![("data", node_list(&self.data))]
    }
}

/// 언어별 설명 하나
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Description {
    /// 언어 코드 (예: `en`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// 설명 본문
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl Node for Description {
    fn entries(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("lang", self.lang.clone().into()),
            ("value", self.value.clone().into()),
        ]
    }
}

/// CPE 구성 루트 노드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configurations {
    /// 구성 데이터 포맷 버전
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cve_data_version: Option<String>,
    /// 구성 노드 목록
    #[serde(default)]
    pub nodes: Vec<ConfigNode>,
}

impl Node for Configurations {
    fn entries(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("cve_data_version", self.cve_data_version.clone().into()),
            ("nodes", node_list(&self.nodes)),
        ]
    }
}

/// CPE 매칭 조건 묶음
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigNode {
    /// 논리 연산자 (`AND`/`OR`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    /// CPE 매칭 목록
    #[serde(default)]
    pub data: Vec<CpeMatch>,
}

impl Node for ConfigNode {
    fn entries(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("operator", self.operator.clone().into()),
            ("data", node_list(&self.data)),
        ]
    }
}

/// CPE URI 하나에 대한 취약 여부
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpeMatch {
    /// 해당 CPE가 취약한지 여부
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vulnerable: Option<bool>,
    /// CPE URI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpe: Option<String>,
}

impl Node for CpeMatch {
    fn entries(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("vulnerable", self.vulnerable.into()),
            ("cpe", self.cpe.clone().into()),
        ]
    }
}

/// 심각도 및 점수 노드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    /// 심각도 등급 (`LOW`/`MEDIUM`/`HIGH`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// 공격 용이성 점수
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exploitability_score: Option<f64>,
    /// 영향 점수
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impact_score: Option<f64>,
    /// CVSS 벡터 상세
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvss: Option<Cvss>,
}

impl Node for Impact {
    fn entries(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("severity", self.severity.clone().into()),
            ("exploitability_score", self.exploitability_score.into()),
            ("impact_score", self.impact_score.into()),
            ("cvss", node_value(self.cvss.as_ref())),
        ]
    }
}

/// CVSS v2 벡터 노드
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cvss {
    /// CVSS 버전
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// 공격 벡터
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_vector: Option<String>,
    /// 공격 복잡도
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_complexity: Option<String>,
    /// 인증 요구 수준
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<String>,
    /// 기밀성 영향
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidentiality_impact: Option<String>,
    /// 무결성 영향
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrity_impact: Option<String>,
    /// 가용성 영향
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_impact: Option<String>,
    /// 기본 점수 (0.0 - 10.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_score: Option<f64>,
}

impl Node for Cvss {
    fn entries(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("version", self.version.clone().into()),
            ("access_vector", self.access_vector.clone().into()),
            ("access_complexity", self.access_complexity.clone().into()),
            ("authentication", self.authentication.clone().into()),
            (
                "confidentiality_impact",
                self.confidentiality_impact.clone().into(),
            ),
            ("integrity_impact", self.integrity_impact.clone().into()),
            (
                "availability_impact",
                self.availability_impact.clone().into(),
            ),
            ("base_score", self.base_score.into()),
        ]
    }
}

/// 단위 테스트 공용 샘플 문서 (제품 5개, 참고 자료 6개, 설명 1개)
#[cfg(test)]
pub fn sample_document() -> Document {
    let products = vec![
        Product {
            vendor_name: Some("openssl".to_owned()),
            product_name: Some("openssl".to_owned()),
            versions: vec!["1.0.1".to_owned(), "1.0.2".to_owned()],
        },
        Product {
            vendor_name: Some("redhat".to_owned()),
            product_name: Some("enterprise_linux_server".to_owned()),
            versions: vec!["6.0".to_owned(), "7.0".to_owned()],
        },
        Product {
            vendor_name: Some("redhat".to_owned()),
            product_name: Some("enterprise_linux_workstation".to_owned()),
            versions: vec!["6.0".to_owned(), "7.0".to_owned()],
        },
        Product {
            vendor_name: Some("canonical".to_owned()),
            product_name: Some("ubuntu_linux".to_owned()),
            versions: vec!["14.04".to_owned(), "15.10".to_owned()],
        },
        Product {
            vendor_name: Some("debian".to_owned()),
            product_name: Some("debian_linux".to_owned()),
            versions: vec!["8.0".to_owned()],
        },
    ];

    let references = vec![
        ("https://www.openssl.org/news/secadv/20160301.txt", "20160301", "CONFIRM"),
        ("https://access.redhat.com/errata/RHSA-2016:0301", "RHSA-2016:0301", "REDHAT"),
        ("https://www.ubuntu.com/usn/USN-2914-1", "USN-2914-1", "UBUNTU"),
        ("https://www.debian.org/security/2016/dsa-3500", "DSA-3500", "DEBIAN"),
        ("https://www.kb.cert.org/vuls/id/583776", "VU#583776", "CERT-VN"),
        ("https://drownattack.com", "DROWN", "MISC"),
    ]
    .into_iter()
    .map(|(url, name, refsource)| Reference {
        url: Some(url.to_owned()),
        name: Some(name.to_owned()),
        refsource: Some(refsource.to_owned()),
    })
    .collect();

    let timestamp = |s: &str| {
        NaiveDateTime::parse_from_str(s, crate::value::TIMESTAMP_FORMAT).unwrap()
    };

    Document {
        id_: Some("CVE-2016-0800".to_owned()),
        cve: Some(Cve {
            id_: Some("CVE-2016-0800".to_owned()),
            assigner: Some("cve@mitre.org".to_owned()),
            data_version: Some("4.0".to_owned()),
            year: Some(2016),
            affects: Some(Affects { data: products }),
            references: Some(References { data: references }),
            descriptions: Some(Descriptions {
                data: vec![Description {
                    lang: Some("en".to_owned()),
                    value: Some(
                        "Cross-protocol attack on TLS using SSLv2 (DROWN attack)".to_owned(),
                    ),
                }],
            }),
        }),
        configurations: Some(Configurations {
            cve_data_version: Some("4.0".to_owned()),
            nodes: vec![ConfigNode {
                operator: Some("OR".to_owned()),
                data: vec![
                    CpeMatch {
                        vulnerable: Some(true),
                        cpe: Some("cpe:/a:openssl:openssl:1.0.1".to_owned()),
                    },
                    CpeMatch {
                        vulnerable: Some(true),
                        cpe: Some("cpe:/a:openssl:openssl:1.0.2".to_owned()),
                    },
                ],
            }],
        }),
        impact: Some(Impact {
            severity: Some("MEDIUM".to_owned()),
            exploitability_score: Some(8.6),
            impact_score: Some(2.9),
            cvss: Some(Cvss {
                version: Some("2.0".to_owned()),
                access_vector: Some("NETWORK".to_owned()),
                access_complexity: Some("MEDIUM".to_owned()),
                authentication: Some("NONE".to_owned()),
                confidentiality_impact: Some("PARTIAL".to_owned()),
                integrity_impact: Some("NONE".to_owned()),
                availability_impact: Some("NONE".to_owned()),
                base_score: Some(4.3),
            }),
        }),
        published_date: Some(timestamp("2016-03-01T20:59Z")),
        modified_date: Some(timestamp("2016-12-03T03:06Z")),
    }
}
