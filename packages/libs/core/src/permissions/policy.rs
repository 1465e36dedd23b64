//! IAM 정책 문서 정의
//!
//! 세션 토큰의 `policy` claim에 들어가는 JSON 구조입니다.
//!
//! ```json
//! {"Version":"2012-10-17","Statement":[{"Effect":"Allow","Action":["s3:GetObject"],"Resource":"*"}]}
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 고정 스키마 버전 태그
pub const POLICY_VERSION: &str = "2012-10-17";

/// 조건 블록 (조건 연산자 → {조건 키 → 값})
///
/// 키 순서가 고정되어야 직렬화 결과가 결정적입니다.
pub type ConditionBlock = BTreeMap<String, serde_json::Value>;

/// Statement 효과
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Effect {
    Allow,
    Deny,
}

/// 단일 문자열 또는 문자열 목록
///
/// wire 형식에서는 두 형태가 모두 허용됩니다. 평가 시에는 `as_slice()`로만 접근합니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    Single(String),
    Multiple(Vec<String>),
}

impl OneOrMany {
    /// 항목 목록
    pub fn as_slice(&self) -> &[String] {
        match self {
            OneOrMany::Single(value) => std::slice::from_ref(value),
            OneOrMany::Multiple(values) => values,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl From<&str> for OneOrMany {
    fn from(value: &str) -> Self {
        OneOrMany::Single(value.to_string())
    }
}

impl From<String> for OneOrMany {
    fn from(value: String) -> Self {
        OneOrMany::Single(value)
    }
}

impl From<Vec<String>> for OneOrMany {
    fn from(values: Vec<String>) -> Self {
        OneOrMany::Multiple(values)
    }
}

/// 정책 Statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(rename = "Effect")]
    pub effect: Effect,

    #[serde(rename = "Action")]
    pub action: OneOrMany,

    #[serde(rename = "Resource")]
    pub resource: OneOrMany,

    #[serde(rename = "Condition", default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionBlock>,
}

impl Statement {
    /// Allow statement 생성
    pub fn allow(action: impl Into<OneOrMany>, resource: impl Into<OneOrMany>) -> Self {
        Self {
            effect: Effect::Allow,
            action: action.into(),
            resource: resource.into(),
            condition: None,
        }
    }

    /// 조건 설정 (빈 블록은 생략)
    pub fn with_condition(mut self, condition: Option<ConditionBlock>) -> Self {
        self.condition = condition.filter(|block| !block.is_empty());
        self
    }

    /// 허용 효과인지 확인
    pub fn is_allow(&self) -> bool {
        matches!(self.effect, Effect::Allow)
    }
}

/// 전체 정책 문서
///
/// Statement 순서는 평가 결과에 영향을 주지 않지만, 직렬화 시 그대로 유지됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,

    #[serde(rename = "Statement", default)]
    pub statements: Vec<Statement>,
}

impl Default for PolicyDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyDocument {
    /// 빈 정책 (모든 요청 거부)
    pub fn new() -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statements: Vec::new(),
        }
    }

    /// Statement 추가
    pub fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// JSON 문자열에서 파싱 후 구조 검증
    pub fn from_json(json: &str) -> Result<Self> {
        let document: PolicyDocument =
            serde_json::from_str(json).map_err(|e| Error::PolicyParse {
                message: e.to_string(),
            })?;
        document.validate()?;
        Ok(document)
    }

    /// compact JSON 문자열로 변환
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// 구조 검증
    ///
    /// 버전 태그가 고정값이어야 하고, 모든 statement는 action/resource를 하나 이상 가져야 합니다.
    pub fn validate(&self) -> Result<()> {
        if self.version != POLICY_VERSION {
            return Err(Error::PolicyParse {
                message: format!("unsupported policy version '{}'", self.version),
            });
        }

        for (index, statement) in self.statements.iter().enumerate() {
            if statement.action.is_empty() {
                return Err(Error::PolicyParse {
                    message: format!("statement {index} has no actions"),
                });
            }
            if statement.resource.is_empty() {
                return Err(Error::PolicyParse {
                    message: format!("statement {index} has no resources"),
                });
            }
        }

        Ok(())
    }

    /// action/resource 허용 여부
    pub fn is_allowed(&self, action: &str, resource: &str) -> bool {
        super::PolicyEvaluator::new(self).is_allowed(action, resource)
    }
}
