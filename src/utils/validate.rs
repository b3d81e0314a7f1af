use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

const MIN_PASSWORD_LEN: usize = 6;
const MAX_PASSWORD_LEN: usize = 128;
const MAX_NAME_LEN: usize = 100;

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 密码策略验证结果
#[derive(Debug, Clone)]
pub struct PasswordValidationResult {
    pub is_valid: bool,
    pub errors: Vec<&'static str>,
}

impl PasswordValidationResult {
    pub fn error_message(&self) -> String {
        self.errors.join("; ")
    }
}

/// 验证密码长度：6 <= x <= 128
pub fn validate_password(password: &str) -> PasswordValidationResult {
    let mut errors = Vec::new();
    let len = password.chars().count();

    if len < MIN_PASSWORD_LEN {
        errors.push("Password must be at least 6 characters long");
    }
    if len > MAX_PASSWORD_LEN {
        errors.push("Password must be at most 128 characters long");
    }
    if password.trim().is_empty() {
        errors.push("Password must not be blank");
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 简化的密码验证（返回 Result）
pub fn validate_password_simple(password: &str) -> Result<(), String> {
    let result = validate_password(password);
    if result.is_valid {
        Ok(())
    } else {
        Err(result.error_message())
    }
}

/// 显示名称：去除首尾空白后非空，最长 100 个字符
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name is required");
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err("Name must be at most 100 characters long");
    }
    Ok(())
}

/// 必填文本字段，返回去除首尾空白后的值
pub fn require_text(field: &str, value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} is required"));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_format() {
        assert!(validate_email("ada@school.test").is_ok());
        assert!(validate_email("first.last+tag@sub.example.org").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a@b.c").is_err());
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("secret").is_valid);
        let result = validate_password("abc");
        assert!(!result.is_valid);
        assert!(
            result
                .errors
                .contains(&"Password must be at least 6 characters long")
        );
        assert!(!validate_password(&"x".repeat(129)).is_valid);
        assert!(validate_password_simple("      ").is_err());
    }

    #[test]
    fn test_name_and_required_text() {
        assert!(validate_name("Ada Lovelace").is_ok());
        assert_eq!(validate_name("   "), Err("Name is required"));
        assert!(validate_name(&"n".repeat(101)).is_err());

        assert_eq!(require_text("title", "  HW1 "), Ok("HW1".to_string()));
        assert_eq!(
            require_text("title", ""),
            Err("title is required".to_string())
        );
    }
}
