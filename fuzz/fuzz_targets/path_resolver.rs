#![no_main]

use chrono::NaiveDate;
use libfuzzer_sys::fuzz_target;

use nvdex_core::paths;
use nvdex_core::schema::{
    Affects, Cve, Cvss, Description, Descriptions, Document, Impact, Product,
};

/// 모든 계층이 채워진 고정 문서
fn fixture() -> Document {
    Document {
        id_: Some("CVE-2016-0800".to_owned()),
        cve: Some(Cve {
            id_: Some("CVE-2016-0800".to_owned()),
            assigner: Some("cve@mitre.org".to_owned()),
            data_version: Some("4.0".to_owned()),
            year: Some(2016),
            affects: Some(Affects {
                data: vec![Product {
                    vendor_name: Some("openssl".to_owned()),
                    product_name: Some("openssl".to_owned()),
                    versions: vec!["1.0.1".to_owned(), "1.0.2".to_owned()],
                }],
            }),
            references: None,
            descriptions: Some(Descriptions {
                data: vec![Description {
                    lang: Some("en".to_owned()),
                    value: Some("cross-protocol attack".to_owned()),
                }],
            }),
        }),
        configurations: None,
        impact: Some(Impact {
            severity: Some("MEDIUM".to_owned()),
            exploitability_score: Some(10.0),
            impact_score: Some(2.9),
            cvss: Some(Cvss {
                version: Some("2.0".to_owned()),
                base_score: Some(4.3),
                ..Cvss::default()
            }),
        }),
        published_date: NaiveDate::from_ymd_opt(2016, 3, 1).and_then(|d| d.and_hms_opt(19, 59, 0)),
        modified_date: None,
    }
}

fuzz_target!(|path: String| {
    let doc = fixture();

    // 경로 해석은 전함수. 어떤 경로든 패닉 없이 값 또는 Absent를 돌려야 한다
    let resolved = paths::resolve(&doc, &path);

    // attr는 선언되지 않은 첫 세그먼트만 에러로 구분한다
    let _ = doc.attr(&path);

    // 이미 해석된 값에 재귀 적용해도 패닉이 없어야 한다
    let _ = paths::resolve_path(&resolved, &path);
});
