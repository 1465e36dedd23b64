//! IAM 정책 생성 및 평가
//!
//! # 개요
//!
//! 세션 자격증명에 담기는 정책 문서를 만들고, 리소스 서버에서 이를 평가합니다.
//! 평가 시 DB 조회는 없습니다. 정책은 서명된 토큰 안에 들어 있습니다.
//!
//! # 모듈 구조
//!
//! - `policy`: 정책 문서 정의
//! - `scope`: 스코프 요청 정의
//! - `builder`: 스코프 요청 → 정책 문서
//! - `evaluator`: 정책 평가기
//! - `matching`: 와일드카드 패턴 매칭
//! - `arn`: 리소스 식별자

pub mod arn;
mod builder;
mod evaluator;
mod matching;
mod policy;
mod scope;

pub use builder::{
    PolicyBuilder, CONDITION_IP_ADDRESS, CONDITION_NUMERIC_LTE, CONTENT_LENGTH_KEY,
};
pub use evaluator::{EvalResult, PolicyEvaluator};
pub use matching::{matches_any, matches_pattern};
pub use policy::{ConditionBlock, Effect, OneOrMany, PolicyDocument, Statement, POLICY_VERSION};
pub use scope::{BucketScope, ScopeConditions, ScopeRequest};
