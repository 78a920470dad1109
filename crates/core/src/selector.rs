//! 쿼리 셀렉터 — 해석된 값에 대한 순수 술어
//!
//! 셀렉터는 경로 해석 결과 하나를 받아 일치 여부만 판정합니다.
//! 상태가 없고 문서를 변경하지 않습니다. 해석 결과가 리스트면
//! 원소 중 하나라도 만족할 때 일치로 판정합니다 (중첩 리스트 포함).
//! 타입이 비교 불가능한 조합이면 에러 대신 불일치(false)로 처리합니다.
//!
//! 정규식 패턴과 범위 경계는 생성 시점에 검증됩니다. 잘못된 입력은
//! [`QueryError::InvalidPattern`] 또는 [`QueryError::InvalidRange`]로
//! 즉시 거부되므로 `find` 루프 안에서는 실패 경로가 없습니다.

use std::cmp::Ordering;

use regex::Regex;

use crate::error::QueryError;
use crate::value::{TIMESTAMP_FORMAT, Value};

/// 경로 해석 결과에 적용하는 술어
///
/// `From` 구현으로 리터럴(문자열, 숫자, 불리언)은 동등 비교 셀렉터로
/// 암묵 변환됩니다. `Query::with("cve.year", 2016)`처럼 사용합니다.
#[derive(Debug, Clone)]
pub enum Selector {
    /// 동등 비교 (리스트면 원소 포함 여부)
    Eq(Value),
    /// 시작 위치에 고정된 정규식 일치
    Match(Regex),
    /// 위치 무관 정규식 검색
    Search(Regex),
    /// 초과 비교
    Gt(Value),
    /// 이상 비교
    Ge(Value),
    /// 미만 비교
    Lt(Value),
    /// 이하 비교
    Le(Value),
    /// 후보 집합 포함 여부
    In(Vec<Value>),
    /// 양끝 포함 범위
    InRange(Value, Value),
}

/// 동등 비교 셀렉터를 만듭니다.
pub fn eq(literal: impl Into<Value>) -> Selector {
    Selector::Eq(literal.into())
}

/// 값의 시작 위치에 고정된 정규식 셀렉터를 만듭니다.
///
/// 패턴은 `^(?:...)`로 감싸 컴파일하므로 `match_("CVE-2016")`은
/// `CVE-2016-0800`과 일치하지만 `old CVE-2016-0800`과는 일치하지 않습니다.
pub fn match_(pattern: &str) -> Result<Selector, QueryError> {
    let regex = compile(pattern, &format!("^(?:{pattern})"))?;
    Ok(Selector::Match(regex))
}

/// 값 내부 어디서든 일치하는 정규식 셀렉터를 만듭니다.
pub fn search(pattern: &str) -> Result<Selector, QueryError> {
    let regex = compile(pattern, pattern)?;
    Ok(Selector::Search(regex))
}

/// 초과 비교 셀렉터를 만듭니다.
pub fn gt(limit: impl Into<Value>) -> Selector {
    Selector::Gt(limit.into())
}

/// 이상 비교 셀렉터를 만듭니다.
pub fn ge(limit: impl Into<Value>) -> Selector {
    Selector::Ge(limit.into())
}

/// 미만 비교 셀렉터를 만듭니다.
pub fn lt(limit: impl Into<Value>) -> Selector {
    Selector::Lt(limit.into())
}

/// 이하 비교 셀렉터를 만듭니다.
pub fn le(limit: impl Into<Value>) -> Selector {
    Selector::Le(limit.into())
}

/// 후보 집합 포함 셀렉터를 만듭니다.
pub fn in_<T: Into<Value>>(candidates: Vec<T>) -> Selector {
    Selector::In(candidates.into_iter().map(Into::into).collect())
}

/// 양끝 포함 범위 셀렉터를 만듭니다. `low < high`가 아니면 거부합니다.
pub fn in_range(low: impl Into<Value>, high: impl Into<Value>) -> Result<Selector, QueryError> {
    let low = low.into();
    let high = high.into();

    if !matches!(low.partial_cmp_loose(&high), Some(Ordering::Less)) {
        return Err(QueryError::InvalidRange {
            low: low.to_string(),
            high: high.to_string(),
        });
    }
    Ok(Selector::InRange(low, high))
}

fn compile(original: &str, effective: &str) -> Result<Regex, QueryError> {
    Regex::new(effective).map_err(|source| QueryError::InvalidPattern {
        pattern: original.to_owned(),
        source,
    })
}

impl Selector {
    /// 해석된 값이 이 셀렉터를 만족하는지 판정합니다.
    ///
    /// [`Value::Absent`]는 어떤 셀렉터와도 일치하지 않습니다.
    pub fn matches(&self, resolved: &Value) -> bool {
        if resolved.is_absent() {
            return false;
        }
        match self {
            Selector::Eq(literal) => {
                resolved.loose_eq(literal) || any_element(resolved, &|v| v.loose_eq(literal))
            }
            Selector::Match(regex) => any_element(resolved, &|v| {
                regex_target(v).is_some_and(|text| regex.is_match(&text))
            }),
            Selector::Search(regex) => any_element(resolved, &|v| {
                regex_target(v).is_some_and(|text| regex.is_match(&text))
            }),
            Selector::Gt(limit) => any_element(resolved, &|v| {
                matches!(v.partial_cmp_loose(limit), Some(Ordering::Greater))
            }),
            Selector::Ge(limit) => any_element(resolved, &|v| {
                matches!(
                    v.partial_cmp_loose(limit),
                    Some(Ordering::Greater | Ordering::Equal)
                )
            }),
            Selector::Lt(limit) => any_element(resolved, &|v| {
                matches!(v.partial_cmp_loose(limit), Some(Ordering::Less))
            }),
            Selector::Le(limit) => any_element(resolved, &|v| {
                matches!(
                    v.partial_cmp_loose(limit),
                    Some(Ordering::Less | Ordering::Equal)
                )
            }),
            Selector::In(candidates) => any_element(resolved, &|v| {
                candidates.iter().any(|candidate| v.loose_eq(candidate))
            }),
            Selector::InRange(low, high) => any_element(resolved, &|v| {
                matches!(
                    v.partial_cmp_loose(low),
                    Some(Ordering::Greater | Ordering::Equal)
                ) && matches!(
                    v.partial_cmp_loose(high),
                    Some(Ordering::Less | Ordering::Equal)
                )
            }),
        }
    }
}

/// 리스트를 임의 깊이까지 풀어 원소 단위로 술어를 적용합니다.
fn any_element(resolved: &Value, pred: &dyn Fn(&Value) -> bool) -> bool {
    match resolved {
        Value::List(items) => items.iter().any(|item| any_element(item, pred)),
        leaf => pred(leaf),
    }
}

/// 정규식 대상 문자열. 컨테이너와 null은 대상이 아니므로 `None`.
fn regex_target(value: &Value) -> Option<String> {
    match value {
        Value::Str(s) => Some(s.clone()),
        Value::Int(n) => Some(n.to_string()),
        Value::Float(x) => Some(x.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Time(t) => Some(t.format(TIMESTAMP_FORMAT).to_string()),
        _ => None,
    }
}

impl From<&str> for Selector {
    fn from(literal: &str) -> Self {
        Selector::Eq(literal.into())
    }
}

impl From<String> for Selector {
    fn from(literal: String) -> Self {
        Selector::Eq(literal.into())
    }
}

impl From<i64> for Selector {
    fn from(literal: i64) -> Self {
        Selector::Eq(literal.into())
    }
}

impl From<i32> for Selector {
    fn from(literal: i32) -> Self {
        Selector::Eq(literal.into())
    }
}

impl From<f64> for Selector {
    fn from(literal: f64) -> Self {
        Selector::Eq(literal.into())
    }
}

impl From<bool> for Selector {
    fn from(literal: bool) -> Self {
        Selector::Eq(literal.into())
    }
}

impl From<Value> for Selector {
    fn from(literal: Value) -> Self {
        Selector::Eq(literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn versions() -> Value {
        Value::List(vec![Value::from("1.0.0"), Value::from("1.4.3")])
    }

    #[test]
    fn eq_compares_scalars_loosely() {
        assert!(eq(5).matches(&Value::Int(5)));
        assert!(eq(5).matches(&Value::Float(5.0)));
        assert!(!eq(5).matches(&Value::Int(6)));
        assert!(!eq(5).matches(&Value::from("5")));
    }

    #[test]
    fn eq_checks_list_membership() {
        assert!(eq("1.4.3").matches(&versions()));
        assert!(!eq("2.0.0").matches(&versions()));
    }

    #[test]
    fn match_is_anchored_at_start() {
        let sel = match_("CVE-2016").unwrap();
        assert!(sel.matches(&Value::from("CVE-2016-0800")));
        assert!(!sel.matches(&Value::from("old CVE-2016-0800")));
    }

    #[test]
    fn search_matches_anywhere() {
        let sel = search("2016").unwrap();
        assert!(sel.matches(&Value::from("CVE-2016-0800")));
        assert!(!sel.matches(&Value::from("CVE-2017-1234")));
    }

    #[test]
    fn regex_applies_to_stringified_numbers() {
        let sel = match_(r"(\d)+").unwrap();
        assert!(sel.matches(&Value::Int(1)));
        assert!(sel.matches(&Value::Float(4.3)));
    }

    #[test]
    fn regex_fails_closed_on_containers() {
        let sel = search("anything").unwrap();
        assert!(!sel.matches(&Value::Map(vec![(
            "anything".to_owned(),
            Value::Int(1)
        )])));
        assert!(!sel.matches(&Value::Null));
    }

    #[test]
    fn ordering_follows_strictness() {
        let five = Value::Int(5);
        assert!(gt(0).matches(&five));
        assert!(!gt(5).matches(&five));
        assert!(ge(5).matches(&five));
        assert!(!lt(0).matches(&five));
        assert!(lt(10).matches(&five));
        assert!(le(5).matches(&five));
    }

    #[test]
    fn ordering_over_list_uses_any_element() {
        assert!(le("1.0.0").matches(&versions()));
        assert!(!lt("1.0.0").matches(&versions()));
        assert!(lt("2.0.0").matches(&versions()));
    }

    #[test]
    fn ordering_fails_closed_on_type_mismatch() {
        assert!(!gt(5).matches(&Value::from("abc")));
        assert!(!le(5).matches(&Value::Bool(true)));
        assert!(!gt("a").matches(&Value::Int(5)));
    }

    #[test]
    fn in_checks_candidate_set() {
        assert!(in_(vec![0, 5, 10, 15]).matches(&Value::Int(5)));
        assert!(!in_(vec![0, 10, 15]).matches(&Value::Int(5)));
        assert!(in_(vec![true, false]).matches(&Value::Bool(false)));
    }

    #[test]
    fn in_range_bounds_are_inclusive() {
        let five = Value::Int(5);
        assert!(in_range(0, 10).unwrap().matches(&five));
        assert!(in_range(5, 10).unwrap().matches(&five));
        assert!(in_range(0, 5).unwrap().matches(&five));
        assert!(!in_range(0, 4).unwrap().matches(&five));
    }

    #[test]
    fn in_range_rejects_inverted_bounds() {
        let err = in_range(100, 10).unwrap_err();
        assert!(matches!(err, QueryError::InvalidRange { .. }));
        assert!(err.to_string().contains("100"));

        assert!(in_range(5, 5).is_err());
    }

    #[test]
    fn invalid_pattern_is_rejected_at_construction() {
        let err = match_("[").unwrap_err();
        assert!(matches!(err, QueryError::InvalidPattern { .. }));
        assert!(search("(unclosed").is_err());
    }

    #[test]
    fn absent_never_matches() {
        assert!(!eq(5).matches(&Value::Absent));
        assert!(!search(".*").unwrap().matches(&Value::Absent));
        assert!(!in_range(0, 10).unwrap().matches(&Value::Absent));
        assert!(!in_(vec![0]).matches(&Value::Absent));
    }

    #[test]
    fn nested_lists_are_flattened_for_matching() {
        let nested = Value::List(vec![versions(), Value::List(vec![Value::from("2.1.0")])]);
        assert!(eq("2.1.0").matches(&nested));
        assert!(search("1\\.4").unwrap().matches(&nested));
    }

    #[test]
    fn literals_convert_to_eq_selectors() {
        let sel: Selector = "MEDIUM".into();
        assert!(sel.matches(&Value::from("MEDIUM")));

        let sel: Selector = 2016.into();
        assert!(sel.matches(&Value::Int(2016)));
    }
}
