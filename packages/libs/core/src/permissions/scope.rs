//! 스코프 요청
//!
//! 세션 자격증명 발급 시 클라이언트가 보내는 권한 범위입니다.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 세션 자격증명 스코프 요청
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeRequest {
    /// 조직 ID (세션 토큰의 subject)
    pub org_id: String,

    /// 리소스 `*`에 대해 허용할 action 목록
    #[serde(default)]
    pub global_actions: Vec<String>,

    /// 버킷별 권한
    #[serde(default)]
    pub buckets: Vec<BucketScope>,

    /// 조건 (모든 statement에 동일하게 붙음)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<ScopeConditions>,
}

/// 버킷 단위 권한
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketScope {
    /// 버킷 ID
    pub bucket_id: String,

    /// 허용 action 목록
    pub actions: Vec<String>,

    /// 객체 key prefix 목록 (비어 있으면 버킷 전체)
    #[serde(default)]
    pub prefixes: Vec<String>,
}

/// 스코프 조건
///
/// 알 수 없는 키는 무시됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeConditions {
    /// 허용 IP 목록 (정확히 일치)
    #[serde(default)]
    pub ip_allowlist: Vec<String>,

    /// 최대 객체 크기 (bytes)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_object_size: Option<u64>,
}

impl ScopeRequest {
    /// 새 요청 생성
    pub fn new(org_id: impl Into<String>) -> Self {
        Self {
            org_id: org_id.into(),
            ..Default::default()
        }
    }

    /// 필수 필드 검증
    ///
    /// 버킷 ID와 prefix에는 와일드카드를 쓸 수 없습니다. 와일드카드는 정책 생성기만 붙입니다.
    pub fn validate(&self) -> Result<()> {
        if self.org_id.trim().is_empty() {
            return Err(Error::InvalidScope {
                reason: "org_id is required".to_string(),
            });
        }

        for (index, bucket) in self.buckets.iter().enumerate() {
            if bucket.bucket_id.trim().is_empty() {
                return Err(Error::InvalidScope {
                    reason: format!("buckets[{index}].bucket_id is required"),
                });
            }
            if bucket.bucket_id.contains(['*', '/']) {
                return Err(Error::InvalidScope {
                    reason: format!("buckets[{index}].bucket_id must not contain '*' or '/'"),
                });
            }
            if bucket.actions.is_empty() {
                return Err(Error::InvalidScope {
                    reason: format!("buckets[{index}].actions must not be empty"),
                });
            }
            if let Some(prefix) = bucket.prefixes.iter().position(|p| p.contains('*')) {
                return Err(Error::InvalidScope {
                    reason: format!("buckets[{index}].prefixes[{prefix}] must not contain '*'"),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scope_request() {
        let json = r#"{
            "org_id": "org_1",
            "global_actions": ["s3:ListAllMyBuckets"],
            "buckets": [{"bucket_id": "b1", "actions": ["s3:GetObject"], "prefixes": ["docs/"]}],
            "conditions": {"ip_allowlist": ["10.0.0.1"], "max_object_size": 1048576, "mfa": true}
        }"#;

        let req: ScopeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.org_id, "org_1");
        assert_eq!(req.buckets[0].prefixes, vec!["docs/"]);

        let conditions = req.conditions.unwrap();
        assert_eq!(conditions.ip_allowlist, vec!["10.0.0.1"]);
        assert_eq!(conditions.max_object_size, Some(1_048_576));
    }

    #[test]
    fn test_validate_required_fields() {
        assert!(ScopeRequest::new("org_1").validate().is_ok());
        assert!(ScopeRequest::new("  ").validate().is_err());

        let mut req = ScopeRequest::new("org_1");
        req.buckets.push(BucketScope {
            bucket_id: "b1".to_string(),
            actions: vec![],
            prefixes: vec![],
        });
        assert!(matches!(req.validate(), Err(Error::InvalidScope { .. })));

        req.buckets[0].actions.push("s3:GetObject".to_string());
        req.buckets[0].bucket_id.clear();
        assert!(matches!(req.validate(), Err(Error::InvalidScope { .. })));
    }

    #[test]
    fn test_wildcards_rejected_in_bucket_scope() {
        let scope = |bucket_id: &str, prefixes: &[&str]| {
            let mut req = ScopeRequest::new("org_1");
            req.buckets.push(BucketScope {
                bucket_id: bucket_id.to_string(),
                actions: vec!["s3:GetObject".to_string()],
                prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
            });
            req
        };

        assert!(scope("b1", &["docs/"]).validate().is_ok());

        for req in [
            scope("*", &[]),
            scope("b*", &[]),
            scope("b1/docs", &[]),
            scope("b1", &["docs/*"]),
            scope("b1", &["ok/", "*"]),
        ] {
            assert!(
                matches!(req.validate(), Err(Error::InvalidScope { .. })),
                "{req:?} should be rejected"
            );
        }
    }
}
