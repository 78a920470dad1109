//! 경로 해석기 — 점 구분 경로의 세그먼트 단위 순회
//!
//! `cve.affects.data.product_name` 같은 경로를 [`Value`] 트리 위에서
//! 해석합니다. 해석은 전함수(total)입니다. 어떤 경로를 주더라도 패닉이나
//! 에러 없이 값 또는 [`Value::Absent`]를 반환합니다.
//!
//! 세그먼트 해석 규칙:
//! - 맵: 세그먼트 하나를 소비하고 해당 키로 내려갑니다. 키가 없으면
//!   전체 경로가 `Absent`입니다.
//! - 리스트: 세그먼트를 소비하지 않고 남은 경로를 각 원소에 적용한 뒤
//!   결과를 모읍니다. `Absent`로 해석된 원소는 건너뜁니다. 남은 경로가
//!   비어 있으면 리스트 자신을 반환합니다.
//! - 스칼라: 남은 경로가 비어 있으면 값 자신, 남아 있으면 `Absent`입니다.

use crate::schema::Node;
use crate::value::Value;

/// 스키마 노드를 루트로 점 구분 경로를 해석합니다.
///
/// 미선언 첫 세그먼트도 에러가 아니라 [`Value::Absent`]로 끝납니다.
/// 선언 여부를 구분해야 하면 [`crate::schema::Document::attr`]을 사용합니다.
pub fn resolve(root: &dyn Node, path: &str) -> Value {
    let mut segments = path.split('.');
    let head = segments.next().unwrap_or(path);
    let rest: Vec<&str> = segments.collect();

    match root.field(head) {
        Some(value) => resolve_segments(&value, &rest),
        None => Value::Absent,
    }
}

/// [`Value`] 트리를 루트로 점 구분 경로를 해석합니다.
pub fn resolve_path(current: &Value, path: &str) -> Value {
    let segments: Vec<&str> = path.split('.').collect();
    resolve_segments(current, &segments)
}

fn resolve_segments(current: &Value, segments: &[&str]) -> Value {
    match current {
        // 리스트는 세그먼트를 소비하지 않고 남은 경로를 원소별로 적용한다
        Value::List(items) => {
            if segments.is_empty() {
                return current.clone();
            }
            let resolved: Vec<Value> = items
                .iter()
                .map(|item| resolve_segments(item, segments))
                .filter(Value::is_present)
                .collect();
            Value::List(resolved)
        }
        Value::Map(entries) => match segments.split_first() {
            None => current.clone(),
            Some((head, rest)) => entries
                .iter()
                .find(|(key, _)| key.as_str() == *head)
                .map(|(_, value)| resolve_segments(value, rest))
                .unwrap_or(Value::Absent),
        },
        scalar => {
            if segments.is_empty() {
                scalar.clone()
            } else {
                Value::Absent
            }
        }
    }
}
