//! 정책 평가기
//!
//! 요청된 action/resource에 대해 정책 문서를 평가합니다.
//! Allow statement만 평가에 참여하며, 일치하는 statement가 없으면 거부(default-deny)입니다.
//! Deny statement는 표현은 가능하지만 평가에 영향을 주지 않습니다.

use super::matching::matches_any;
use super::policy::PolicyDocument;
use crate::error::{Error, Result};

/// 평가 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvalResult {
    /// 허용 여부
    pub allowed: bool,

    /// 허용을 결정한 statement 인덱스
    pub statement: Option<usize>,

    /// 거부 사유 (allowed=false인 경우)
    pub reason: Option<String>,
}

impl EvalResult {
    /// 허용 결과 생성
    pub fn allow(statement: usize) -> Self {
        Self {
            allowed: true,
            statement: Some(statement),
            reason: None,
        }
    }

    /// 거부 결과 생성
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            statement: None,
            reason: Some(reason.into()),
        }
    }
}

/// 정책 평가기
///
/// 읽기 전용이며 같은 입력에 대해 항상 같은 결과를 냅니다.
pub struct PolicyEvaluator<'a> {
    policy: &'a PolicyDocument,
}

impl<'a> PolicyEvaluator<'a> {
    /// 새 평가기 생성
    pub fn new(policy: &'a PolicyDocument) -> Self {
        Self { policy }
    }

    /// action/resource 평가 (First Match Wins)
    pub fn evaluate(&self, action: &str, resource: &str) -> EvalResult {
        for (index, statement) in self.policy.statements.iter().enumerate() {
            if !statement.is_allow() {
                continue;
            }

            if !matches_any(statement.action.as_slice(), action) {
                continue;
            }

            if matches_any(statement.resource.as_slice(), resource) {
                return EvalResult::allow(index);
            }
        }

        EvalResult::deny(format!("action {action} not allowed on resource {resource}"))
    }

    /// 허용 여부만 반환
    pub fn is_allowed(&self, action: &str, resource: &str) -> bool {
        self.evaluate(action, resource).allowed
    }

    /// 거부 시 `AccessDenied` 에러
    pub fn authorize(&self, action: &str, resource: &str) -> Result<()> {
        let result = self.evaluate(action, resource);
        if result.allowed {
            return Ok(());
        }

        Err(Error::AccessDenied {
            reason: result
                .reason
                .unwrap_or_else(|| "no matching statement".to_string()),
        })
    }
}
