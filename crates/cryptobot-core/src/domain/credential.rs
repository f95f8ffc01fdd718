//! 거래소 API 자격증명.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

/// 거래소 API 키 쌍.
///
/// # 보안
/// - 시크릿 키는 `SecretString`으로 보관되어 drop 시 메모리가 지워집니다.
/// - `Debug` 구현은 API 키를 마스킹하고 시크릿을 출력하지 않습니다.
pub struct Credential {
    api_key: String,
    secret_key: SecretString,
}

impl Credential {
    /// 새 자격증명 생성.
    pub fn new(api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: SecretString::from(secret_key.into()),
        }
    }

    /// API 키 (접근 키).
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// 서명용 시크릿 키를 노출합니다.
    ///
    /// 암호 연산에만 사용하고 절대 로그에 남기지 마세요.
    pub fn expose_secret(&self) -> &str {
        self.secret_key.expose_secret()
    }

    /// 키와 시크릿이 모두 비어 있지 않은지 확인.
    pub fn is_complete(&self) -> bool {
        !self.api_key.is_empty() && !self.secret_key.expose_secret().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 바이트가 아닌 문자 단위로 잘라야 멀티바이트 키에서 패닉하지 않음
        let char_count = self.api_key.chars().count();
        let masked_key = if char_count > 8 {
            let head: String = self.api_key.chars().take(4).collect();
            let tail: String = self.api_key.chars().skip(char_count - 4).collect();
            format!("{}...{}", head, tail)
        } else {
            "***REDACTED***".to_string()
        };

        f.debug_struct("Credential")
            .field("api_key", &masked_key)
            .field("secret_key", &"***REDACTED***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secret() {
        let credential = Credential::new("abcd1234efgh5678", "super-secret-value");
        let debug_str = format!("{:?}", credential);

        assert!(debug_str.contains("abcd...5678"));
        assert!(!debug_str.contains("super-secret-value"));
        assert!(!debug_str.contains("abcd1234efgh5678"));
    }

    #[test]
    fn test_debug_masks_multibyte_key() {
        let credential = Credential::new("키abc한글한글xyz값", "secret");
        let debug_str = format!("{:?}", credential);
        assert!(debug_str.contains("키abc...xyz값"));

        let short = Credential::new("한글한글", "secret");
        assert!(format!("{:?}", short).contains("***REDACTED***"));
    }

    #[test]
    fn test_is_complete() {
        assert!(Credential::new("key", "secret").is_complete());
        assert!(!Credential::new("", "secret").is_complete());
        assert!(!Credential::new("key", "").is_complete());
    }
}
