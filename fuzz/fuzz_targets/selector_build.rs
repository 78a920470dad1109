#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use nvdex_core::selector::{self, Selector};
use nvdex_core::value::Value;

/// 퍼저용 구조적 입력
#[derive(Arbitrary, Debug)]
struct FuzzInput {
    spec: FuzzSelector,
    probe: FuzzScalar,
}

#[derive(Arbitrary, Debug)]
enum FuzzSelector {
    Eq(FuzzScalar),
    Match(String),
    Search(String),
    Gt(f64),
    Ge(f64),
    Lt(i64),
    Le(i64),
    In(Vec<i64>),
    InRange(f64, f64),
}

#[derive(Arbitrary, Debug)]
enum FuzzScalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<i64>),
}

impl FuzzScalar {
    fn to_value(&self) -> Value {
        match self {
            FuzzScalar::Null => Value::Null,
            FuzzScalar::Bool(b) => Value::Bool(*b),
            FuzzScalar::Int(i) => Value::Int(*i),
            FuzzScalar::Float(f) => Value::Float(*f),
            FuzzScalar::Str(s) => Value::Str(s.clone()),
            FuzzScalar::List(items) => {
                Value::List(items.iter().map(|&i| Value::Int(i)).collect())
            }
        }
    }
}

fn build(spec: &FuzzSelector) -> Option<Selector> {
    match spec {
        FuzzSelector::Eq(scalar) => Some(selector::eq(scalar.to_value())),
        FuzzSelector::Match(pattern) => selector::match_(pattern).ok(),
        FuzzSelector::Search(pattern) => selector::search(pattern).ok(),
        FuzzSelector::Gt(limit) => Some(selector::gt(*limit)),
        FuzzSelector::Ge(limit) => Some(selector::ge(*limit)),
        FuzzSelector::Lt(limit) => Some(selector::lt(*limit)),
        FuzzSelector::Le(limit) => Some(selector::le(*limit)),
        FuzzSelector::In(candidates) => Some(selector::in_(candidates.clone())),
        FuzzSelector::InRange(low, high) => selector::in_range(*low, *high).ok(),
    }
}

fuzz_target!(|input: FuzzInput| {
    // 잘못된 패턴과 범위는 생성 단계에서 Err로 걸러진다
    let Some(sel) = build(&input.spec) else {
        return;
    };

    // 매칭은 실패 폐쇄형. 어떤 값에도 패닉 없이 bool을 돌려야 한다
    let _ = sel.matches(&input.probe.to_value());
    let _ = sel.matches(&Value::Absent);
});
