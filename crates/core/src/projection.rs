//! 프로젝션 — 경로 선택/제외로 만드는 문서의 부분 뷰
//!
//! 프로젝션 명세는 포함 경로 집합이거나 제외 경로 집합 중 하나입니다.
//! 두 방향을 섞은 명세는 타입 수준에서 표현할 수 없고, 0/1 플래그 맵에서
//! 변환할 때 [`QueryError::InvalidProjection`]으로 거부됩니다.
//!
//! 결과는 스키마 검증 없는 동적 [`Value`] 트리이며, 경로 해석과
//! pretty 렌더링을 문서와 동일하게 지원합니다. 원본 문서는 변경되지
//! 않습니다.

use crate::error::QueryError;
use crate::paths::resolve_path;
use crate::schema::{Document, Node};
use crate::value::Value;

/// 프로젝션 명세 — 포함 목록 또는 제외 목록
#[derive(Debug, Clone, PartialEq)]
pub enum ProjectionSpec {
    /// 나열된 경로만 남깁니다.
    Include(Vec<String>),
    /// 나열된 경로만 제거합니다. 빈 목록은 항등 프로젝션입니다.
    Exclude(Vec<String>),
}

impl ProjectionSpec {
    /// 포함 명세를 만듭니다.
    pub fn include<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ProjectionSpec::Include(paths.into_iter().map(Into::into).collect())
    }

    /// 제외 명세를 만듭니다.
    pub fn exclude<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ProjectionSpec::Exclude(paths.into_iter().map(Into::into).collect())
    }

    /// `경로 -> 0|1` 플래그 맵을 명세로 변환합니다.
    ///
    /// 1 플래그가 하나라도 있으면 포함 명세, 전부 0이면 제외 명세입니다.
    /// 두 종류가 섞이면 [`QueryError::InvalidProjection`]을 반환합니다.
    /// 빈 맵은 항등 프로젝션입니다.
    pub fn from_flags<I, S>(flags: I) -> Result<Self, QueryError>
    where
        I: IntoIterator<Item = (S, u8)>,
        S: Into<String>,
    {
        let mut include = Vec::new();
        let mut exclude = Vec::new();

        for (path, flag) in flags {
            if flag == 0 {
                exclude.push(path.into());
            } else {
                include.push(path.into());
            }
        }

        if !include.is_empty() && !exclude.is_empty() {
            return Err(QueryError::InvalidProjection {
                reason: "cannot mix include and exclude paths in one projection".to_owned(),
            });
        }

        if include.is_empty() {
            Ok(ProjectionSpec::Exclude(exclude))
        } else {
            Ok(ProjectionSpec::Include(include))
        }
    }

    fn apply(&self, root: &Value) -> Value {
        match self {
            ProjectionSpec::Include(paths) => project_include(root, &split_paths(paths)),
            ProjectionSpec::Exclude(paths) => project_exclude(root, &split_paths(paths)),
        }
    }
}

/// 문서에서 파생된 부분 뷰
///
/// 스키마 노드가 아닌 동적 트리이므로 어떤 경로든 해석을 시도할 수 있고,
/// 실패는 언제나 [`Value::Absent`]입니다.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    root: Value,
}

impl Projection {
    fn new(tree: Value, spec: &ProjectionSpec) -> Self {
        let projected = spec.apply(&tree);
        let root = if projected.is_absent() {
            Value::Map(Vec::new())
        } else {
            projected
        };
        Projection { root }
    }

    /// 프로젝션 위에서 점 구분 경로를 해석합니다.
    pub fn resolve(&self, path: &str) -> Value {
        resolve_path(&self.root, path)
    }

    /// 프로젝션에서 다시 프로젝션을 만듭니다.
    pub fn project(&self, spec: &ProjectionSpec) -> Projection {
        Projection::new(self.root.clone(), spec)
    }

    /// 남은 필드를 선언 순서대로 렌더링합니다.
    pub fn pretty(&self) -> String {
        self.root.to_pretty()
    }

    /// 내부 트리를 참조로 반환합니다.
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// JSON 표현을 만듭니다.
    pub fn to_json(&self) -> serde_json::Value {
        self.root.to_json()
    }

    /// 남은 필드가 하나도 없으면 true.
    pub fn is_empty(&self) -> bool {
        matches!(&self.root, Value::Map(entries) if entries.is_empty())
    }
}

impl Document {
    /// 명세에 따라 부분 뷰를 만듭니다. 원본 문서는 그대로 유지됩니다.
    pub fn project(&self, spec: &ProjectionSpec) -> Projection {
        Projection::new(self.to_value(), spec)
    }
}

fn split_paths(paths: &[String]) -> Vec<Vec<&str>> {
    paths.iter().map(|p| p.split('.').collect()).collect()
}

fn project_include(value: &Value, paths: &[Vec<&str>]) -> Value {
    // 빈 경로는 이 서브트리 전체를 선택한다
    if paths.iter().any(|p| p.is_empty()) {
        return value.clone();
    }
    match value {
        Value::Map(entries) => {
            let mut out = Vec::new();
            for (key, item) in entries {
                let rests: Vec<Vec<&str>> = paths
                    .iter()
                    .filter(|p| p.first().copied() == Some(key.as_str()))
                    .map(|p| p[1..].to_vec())
                    .collect();
                if rests.is_empty() {
                    continue;
                }
                let projected = project_include(item, &rests);
                if projected.is_present() {
                    out.push((key.clone(), projected));
                }
            }
            if out.is_empty() {
                Value::Absent
            } else {
                Value::Map(out)
            }
        }
        // 리스트는 세그먼트를 소비하지 않는다 (경로 해석기와 동일)
        Value::List(items) => {
            let projected: Vec<Value> = items
                .iter()
                .map(|item| project_include(item, paths))
                .filter(Value::is_present)
                .collect();
            if projected.is_empty() {
                Value::Absent
            } else {
                Value::List(projected)
            }
        }
        _ => Value::Absent,
    }
}

fn project_exclude(value: &Value, paths: &[Vec<&str>]) -> Value {
    // 빈 경로는 이 서브트리 전체를 제거한다
    if paths.iter().any(|p| p.is_empty()) {
        return Value::Absent;
    }
    match value {
        Value::Map(entries) => {
            let mut out = Vec::new();
            for (key, item) in entries {
                let rests: Vec<Vec<&str>> = paths
                    .iter()
                    .filter(|p| p.first().copied() == Some(key.as_str()))
                    .map(|p| p[1..].to_vec())
                    .collect();
                let projected = if rests.is_empty() {
                    item.clone()
                } else {
                    project_exclude(item, &rests)
                };
                if projected.is_present() {
                    out.push((key.clone(), projected));
                }
            }
            Value::Map(out)
        }
        Value::List(items) => Value::List(
            items
                .iter()
                .map(|item| project_exclude(item, paths))
                .filter(Value::is_present)
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}
