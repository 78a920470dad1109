//! 동적 값 표현 — 경로 해석과 셀렉터 평가의 공통 화폐
//!
//! 스키마 노드는 [`Value`] 트리로 변환된 뒤 경로 해석기와 셀렉터가 순회합니다.
//! [`Value::Absent`]는 "선언되었으나 값이 없음"을 나타내는 센티널이며,
//! 렌더링과 직렬화에서 항상 생략됩니다.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;

/// NVD 1.0 피드의 타임스탬프 형식 (`2019-02-15T19:14Z`)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%MZ";

/// 문서 트리를 구성하는 동적 값
///
/// `Map`은 선언 순서를 보존하기 위해 `Vec<(String, Value)>`로 표현합니다.
/// 정렬 맵을 사용하면 pretty 출력이 스키마 선언 순서를 잃게 됩니다.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// 선언되었으나 존재하지 않는 값
    Absent,
    /// 명시적 null
    Null,
    /// 불리언
    Bool(bool),
    /// 정수
    Int(i64),
    /// 부동소수점
    Float(f64),
    /// 문자열
    Str(String),
    /// 피드 타임스탬프 (UTC, 분 단위 정밀도)
    Time(NaiveDateTime),
    /// 리스트
    List(Vec<Value>),
    /// 키-값 쌍 (선언 순서 보존)
    Map(Vec<(String, Value)>),
}

impl Value {
    /// 센티널 여부를 반환합니다.
    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    /// 센티널이 아닌 실제 값인지 확인합니다.
    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    /// 숫자 값을 `f64`로 통일합니다. 숫자가 아니면 `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    /// 타입을 넘나드는 동등 비교
    ///
    /// `Int(5)`와 `Float(5.0)`은 같은 값으로 취급합니다.
    /// 숫자 쌍이 아니면 구조적 동등성으로 비교합니다.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }

    /// 타입을 넘나드는 순서 비교
    ///
    /// 숫자끼리는 `f64`로, 문자열은 사전순, 타임스탬프는 시간순으로 비교합니다.
    /// 비교 불가능한 타입 조합은 `None`을 반환하며 셀렉터는 이를 불일치로 간주합니다.
    pub fn partial_cmp_loose(&self, other: &Value) -> Option<Ordering> {
        if let (Some(a), Some(b)) = (self.as_f64(), other.as_f64()) {
            return a.partial_cmp(&b);
        }
        match (self, other) {
            (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
            (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
            (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// 들여쓰기 기반의 사람이 읽기 좋은 표현을 생성합니다.
    ///
    /// 맵 키는 삽입(= 스키마 선언) 순서대로 출력되고 `Absent` 항목은 생략됩니다.
    ///
    /// ```text
    /// id_: CVE-2019-0001
    /// cve:
    ///   id_: CVE-2019-0001
    ///   year: 2019
    /// ```
    pub fn to_pretty(&self) -> String {
        let mut out = String::new();
        write_pretty(self, 0, &mut out);
        out
    }

    /// JSON 값으로 변환합니다. `Absent` 맵 항목은 생략, 최상위 `Absent`는 null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Absent | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(n) => serde_json::Value::Number((*n).into()),
            Value::Float(x) => serde_json::Number::from_f64(*x)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Time(t) => serde_json::Value::String(t.format(TIMESTAMP_FORMAT).to_string()),
            Value::List(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Map(entries) => {
                let mut map = serde_json::Map::new();
                for (key, item) in entries {
                    if item.is_absent() {
                        continue;
                    }
                    map.insert(key.clone(), item.to_json());
                }
                serde_json::Value::Object(map)
            }
        }
    }
}

fn write_pretty(value: &Value, indent: usize, out: &mut String) {
    let pad = " ".repeat(indent);
    match value {
        Value::Map(entries) => {
            for (key, item) in entries {
                if item.is_absent() {
                    continue;
                }
                match item {
                    Value::List(inner) if inner.is_empty() => {
                        out.push_str(&format!("{pad}{key}: []\n"));
                    }
                    Value::Map(inner) if inner.is_empty() => {
                        out.push_str(&format!("{pad}{key}: {{}}\n"));
                    }
                    Value::List(_) | Value::Map(_) => {
                        out.push_str(&format!("{pad}{key}:\n"));
                        write_pretty(item, indent + 2, out);
                    }
                    scalar => {
                        out.push_str(&format!("{pad}{key}: {scalar}\n"));
                    }
                }
            }
        }
        Value::List(items) => {
            for item in items {
                match item {
                    Value::List(inner) if inner.is_empty() => {
                        out.push_str(&format!("{pad}- []\n"));
                    }
                    Value::Map(inner) if inner.is_empty() => {
                        out.push_str(&format!("{pad}- {{}}\n"));
                    }
                    Value::List(_) | Value::Map(_) => {
                        out.push_str(&format!("{pad}-\n"));
                        write_pretty(item, indent + 2, out);
                    }
                    scalar => {
                        out.push_str(&format!("{pad}- {scalar}\n"));
                    }
                }
            }
        }
        scalar => {
            out.push_str(&format!("{pad}{scalar}\n"));
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "<absent>"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
            Value::Time(t) => write!(f, "{}", t.format(TIMESTAMP_FORMAT)),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                let mut first = true;
                for (key, item) in entries {
                    if item.is_absent() {
                        continue;
                    }
                    if !first {
                        write!(f, ", ")?;
                    }
                    first = false;
                    write!(f, "{key}: {item}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Value::Time(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Value::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).unwrap()
    }

    #[test]
    fn loose_eq_unifies_int_and_float() {
        assert!(Value::Int(5).loose_eq(&Value::Float(5.0)));
        assert!(Value::Float(5.0).loose_eq(&Value::Int(5)));
        assert!(!Value::Int(5).loose_eq(&Value::Float(5.5)));
    }

    #[test]
    fn loose_eq_falls_back_to_structural() {
        assert!(Value::Str("a".to_owned()).loose_eq(&Value::from("a")));
        assert!(!Value::Str("5".to_owned()).loose_eq(&Value::Int(5)));
        assert!(Value::Null.loose_eq(&Value::Null));
    }

    #[test]
    fn partial_cmp_loose_orders_numbers() {
        assert_eq!(
            Value::Int(3).partial_cmp_loose(&Value::Float(3.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::Float(4.0).partial_cmp_loose(&Value::Int(4)),
            Some(Ordering::Equal)
        );
    }

    #[test]
    fn partial_cmp_loose_orders_strings_lexicographically() {
        let a = Value::from("1.0.0");
        let b = Value::from("1.4.3");
        assert_eq!(a.partial_cmp_loose(&b), Some(Ordering::Less));
    }

    #[test]
    fn partial_cmp_loose_rejects_mixed_types() {
        assert_eq!(Value::from("5").partial_cmp_loose(&Value::Int(5)), None);
        assert_eq!(Value::Null.partial_cmp_loose(&Value::Int(0)), None);
        assert_eq!(
            Value::List(vec![]).partial_cmp_loose(&Value::List(vec![])),
            None
        );
    }

    #[test]
    fn partial_cmp_loose_orders_timestamps() {
        let early = Value::Time(ts("2019-01-01T00:00Z"));
        let late = Value::Time(ts("2020-06-15T12:30Z"));
        assert_eq!(early.partial_cmp_loose(&late), Some(Ordering::Less));
    }

    #[test]
    fn pretty_skips_absent_entries() {
        let map = Value::Map(vec![
            ("id".to_owned(), Value::from("CVE-2019-0001")),
            ("missing".to_owned(), Value::Absent),
            ("year".to_owned(), Value::Int(2019)),
        ]);
        let rendered = map.to_pretty();
        assert!(rendered.contains("id: CVE-2019-0001"));
        assert!(rendered.contains("year: 2019"));
        assert!(!rendered.contains("missing"));
    }

    #[test]
    fn pretty_indents_nested_containers() {
        let map = Value::Map(vec![(
            "cve".to_owned(),
            Value::Map(vec![("id".to_owned(), Value::from("CVE-2019-0001"))]),
        )]);
        assert_eq!(map.to_pretty(), "cve:\n  id: CVE-2019-0001\n");
    }

    #[test]
    fn pretty_renders_list_elements_in_order() {
        let list = Value::List(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(list.to_pretty(), "- a\n- b\n");
    }

    #[test]
    fn pretty_marks_empty_containers() {
        let map = Value::Map(vec![
            ("versions".to_owned(), Value::List(vec![])),
            ("extra".to_owned(), Value::Map(vec![])),
        ]);
        let rendered = map.to_pretty();
        assert!(rendered.contains("versions: []"));
        assert!(rendered.contains("extra: {}"));
    }

    #[test]
    fn pretty_preserves_declared_order() {
        let map = Value::Map(vec![
            ("zulu".to_owned(), Value::Int(1)),
            ("alpha".to_owned(), Value::Int(2)),
        ]);
        assert_eq!(map.to_pretty(), "zulu: 1\nalpha: 2\n");
    }

    #[test]
    fn to_json_drops_absent_map_entries() {
        let map = Value::Map(vec![
            ("id".to_owned(), Value::from("CVE-2019-0001")),
            ("missing".to_owned(), Value::Absent),
        ]);
        let json = map.to_json();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert_eq!(obj["id"], serde_json::json!("CVE-2019-0001"));
    }

    #[test]
    fn to_json_formats_timestamps() {
        let value = Value::Time(ts("2019-02-15T19:14Z"));
        assert_eq!(value.to_json(), serde_json::json!("2019-02-15T19:14Z"));
    }

    #[test]
    fn from_option_maps_none_to_absent() {
        let none: Option<i64> = None;
        assert_eq!(Value::from(none), Value::Absent);
        assert_eq!(Value::from(Some(7i64)), Value::Int(7));
    }

    #[test]
    fn display_renders_scalars() {
        assert_eq!(Value::from("x").to_string(), "x");
        assert_eq!(Value::Int(42).to_string(), "42");
        assert_eq!(Value::Absent.to_string(), "<absent>");
        assert_eq!(Value::Time(ts("2019-02-15T19:14Z")).to_string(), "2019-02-15T19:14Z");
    }
}
