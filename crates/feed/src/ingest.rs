//! 피드 적재 — NVD 1.0 JSON 레코드를 스키마 문서로 변환
//!
//! 피드 JSON의 `CVE_Items` 배열을 순회하며 레코드마다 [`Document`]를
//! 만듭니다. 원본의 중첩 구조(`vendor_data` 안의 `product_data` 안의
//! `version_data`)는 벤더-제품 조합별로 평탄화하고, 필드가 빠진 레코드는
//! 에러 없이 부재 필드로 적재합니다.

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;
use tracing::debug;

use nvdex_core::schema::{
    Affects, ConfigNode, Configurations, CpeMatch, Cve, Cvss, Description, Descriptions, Document,
    Impact, Product, Reference, References,
};
use nvdex_core::value::TIMESTAMP_FORMAT;
use nvdex_core::Collection;

use crate::error::FeedFetchError;
use crate::id::FeedId;
use crate::store::FeedStore;

/// 피드 JSON 본문을 문서 컬렉션으로 파싱합니다.
pub fn collection_from_json(bytes: &[u8]) -> Result<Collection, FeedFetchError> {
    Ok(Collection::new(documents_from_json(bytes)?))
}

/// 피드 JSON 본문을 문서 목록으로 파싱합니다. 레코드 순서는 보존됩니다.
pub fn documents_from_json(bytes: &[u8]) -> Result<Vec<Document>, FeedFetchError> {
    let root: JsonValue = serde_json::from_slice(bytes).map_err(|e| FeedFetchError::Ingest {
        reason: format!("invalid feed json: {e}"),
    })?;
    let items = root
        .get("CVE_Items")
        .and_then(JsonValue::as_array)
        .ok_or_else(|| FeedFetchError::Ingest {
            reason: "missing CVE_Items array".to_owned(),
        })?;

    let documents: Vec<Document> = items.iter().map(document_from_record).collect();
    debug!(documents = documents.len(), "feed body parsed");
    Ok(documents)
}

/// 캐시된 피드들을 읽어 하나의 컬렉션으로 합칩니다.
///
/// 문서 순서는 피드 목록 순서, 피드 안에서는 레코드 순서를 따릅니다.
pub async fn load_cached(
    store: &FeedStore,
    feeds: &[FeedId],
) -> Result<Collection, FeedFetchError> {
    let mut documents = Vec::new();
    for &feed in feeds {
        let bytes = store.read_data(feed).await?;
        documents.extend(documents_from_json(&bytes)?);
    }
    Ok(Collection::new(documents))
}

/// `CVE_Items` 레코드 하나를 문서로 변환합니다.
///
/// 변환은 전함수입니다. 어떤 필드가 빠져 있든 에러 대신 부재 필드를
/// 가진 문서를 돌려줍니다.
pub fn document_from_record(record: &JsonValue) -> Document {
    let id = str_at(record, "/cve/CVE_data_meta/ID");

    Document {
        id_: id.clone(),
        cve: record.get("cve").map(|cve| build_cve(cve, id.as_deref())),
        configurations: record.get("configurations").map(build_configurations),
        impact: record.pointer("/impact/baseMetricV2").map(build_impact),
        published_date: timestamp_at(record, "/publishedDate"),
        modified_date: timestamp_at(record, "/lastModifiedDate"),
    }
}

fn build_cve(cve: &JsonValue, id: Option<&str>) -> Cve {
    Cve {
        id_: id.map(str::to_owned),
        assigner: str_at(cve, "/CVE_data_meta/ASSIGNER"),
        data_version: str_at(cve, "/data_version"),
        year: id.and_then(year_from_id),
        affects: cve.get("affects").map(build_affects),
        references: cve.get("references").map(build_references),
        descriptions: cve.get("description").map(build_descriptions),
    }
}

/// `CVE-YYYY-NNNN`의 가운데 토큰을 연도로 파싱합니다.
fn year_from_id(id: &str) -> Option<i64> {
    id.split('-').nth(1).and_then(|y| y.parse::<i64>().ok())
}

/// 벤더/제품/버전 3단 중첩을 벤더-제품 조합별 [`Product`]로 평탄화합니다.
fn build_affects(affects: &JsonValue) -> Affects {
    let mut data = Vec::new();
    for vendor in array_at(affects, "/vendor/vendor_data") {
        let vendor_name = str_at(vendor, "/vendor_name");
        for product in array_at(vendor, "/product/product_data") {
            let versions = array_at(product, "/version/version_data")
                .iter()
                .filter_map(|entry| str_at(entry, "/version_value"))
                .collect();
            data.push(Product {
                vendor_name: vendor_name.clone(),
                product_name: str_at(product, "/product_name"),
                versions,
            });
        }
    }
    Affects { data }
}

fn build_references(references: &JsonValue) -> References {
    let data = array_at(references, "/reference_data")
        .iter()
        .map(|entry| Reference {
            url: str_at(entry, "/url"),
            name: str_at(entry, "/name"),
            refsource: str_at(entry, "/refsource"),
        })
        .collect();
    References { data }
}

fn build_descriptions(description: &JsonValue) -> Descriptions {
    let data = array_at(description, "/description_data")
        .iter()
        .map(|entry| Description {
            lang: str_at(entry, "/lang"),
            value: str_at(entry, "/value"),
        })
        .collect();
    Descriptions { data }
}

fn build_configurations(configurations: &JsonValue) -> Configurations {
    let nodes = array_at(configurations, "/nodes")
        .iter()
        .map(build_config_node)
        .collect();
    Configurations {
        cve_data_version: str_at(configurations, "/CVE_data_version"),
        nodes,
    }
}

fn build_config_node(node: &JsonValue) -> ConfigNode {
    // 초기 연도 피드는 cpe_match 대신 cpe 키를 씁니다.
    let matches = node
        .get("cpe_match")
        .or_else(|| node.get("cpe"))
        .and_then(JsonValue::as_array);
    let data = matches
        .map(|entries| {
            entries
                .iter()
                .map(|entry| CpeMatch {
                    vulnerable: entry.get("vulnerable").and_then(JsonValue::as_bool),
                    cpe: str_at(entry, "/cpe23Uri").or_else(|| str_at(entry, "/cpe22Uri")),
                })
                .collect()
        })
        .unwrap_or_default();

    ConfigNode {
        operator: str_at(node, "/operator"),
        data,
    }
}

fn build_impact(metric: &JsonValue) -> Impact {
    Impact {
        severity: str_at(metric, "/severity"),
        exploitability_score: f64_at(metric, "/exploitabilityScore"),
        impact_score: f64_at(metric, "/impactScore"),
        cvss: metric.get("cvssV2").map(build_cvss),
    }
}

fn build_cvss(vector: &JsonValue) -> Cvss {
    Cvss {
        version: str_at(vector, "/version"),
        access_vector: str_at(vector, "/accessVector"),
        access_complexity: str_at(vector, "/accessComplexity"),
        authentication: str_at(vector, "/authentication"),
        confidentiality_impact: str_at(vector, "/confidentialityImpact"),
        integrity_impact: str_at(vector, "/integrityImpact"),
        availability_impact: str_at(vector, "/availabilityImpact"),
        base_score: f64_at(vector, "/baseScore"),
    }
}

fn str_at(value: &JsonValue, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(JsonValue::as_str)
        .map(str::to_owned)
}

fn f64_at(value: &JsonValue, pointer: &str) -> Option<f64> {
    value.pointer(pointer).and_then(JsonValue::as_f64)
}

fn array_at<'a>(value: &'a JsonValue, pointer: &str) -> &'a [JsonValue] {
    value
        .pointer(pointer)
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn timestamp_at(value: &JsonValue, pointer: &str) -> Option<NaiveDateTime> {
    value
        .pointer(pointer)
        .and_then(JsonValue::as_str)
        .and_then(|s| NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).ok())
}
