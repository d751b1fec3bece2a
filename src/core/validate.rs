use crate::config::UploadConfig;
use super::errors::ValidationError;
use super::types::FileDescriptor;

/// 校验文件，按顺序检查大小和类型，返回第一个不满足的规则
pub fn validate(file: &FileDescriptor, config: &UploadConfig) -> Option<ValidationError> {
    if let Some(limit) = config.max_file_size {
        if file.size > limit {
            return Some(ValidationError::FileTooLarge { limit });
        }
    }

    if !config.allowed_types.is_empty() && !config.allowed_types.contains(&file.content_type) {
        return Some(ValidationError::TypeNotAllowed {
            file_type: file.content_type.clone(),
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEN_MB: u64 = 10 * 1024 * 1024;

    fn file(size: usize, content_type: &str) -> FileDescriptor {
        FileDescriptor::from_bytes("file.bin", content_type, vec![0u8; size])
    }

    fn sized(size: u64, content_type: &str) -> FileDescriptor {
        FileDescriptor {
            size,
            ..file(0, content_type)
        }
    }

    #[test]
    fn test_no_constraints() {
        let config = UploadConfig::new("http://localhost");
        assert_eq!(validate(&sized(u64::MAX, "anything/at-all"), &config), None);
    }

    #[test]
    fn test_size_limit() {
        let config = UploadConfig::new("http://localhost").with_max_file_size(TEN_MB);

        for size in [0, 1, TEN_MB - 1, TEN_MB] {
            assert_eq!(validate(&sized(size, "text/plain"), &config), None);
        }

        for size in [TEN_MB + 1, 50 * 1024 * 1024] {
            let error = validate(&sized(size, "text/plain"), &config).unwrap();
            assert_eq!(error, ValidationError::FileTooLarge { limit: TEN_MB });
            assert_eq!(error.to_string(), "File size exceeds 10.0MB limit");
        }
    }

    #[test]
    fn test_fractional_limit_message() {
        let config = UploadConfig::new("http://localhost").with_max_file_size(1_572_864);
        let error = validate(&sized(2_000_000, "text/plain"), &config).unwrap();
        assert_eq!(error.to_string(), "File size exceeds 1.5MB limit");
    }

    #[test]
    fn test_allowed_types() {
        let config = UploadConfig::new("http://localhost")
            .with_allowed_types(["image/png", "image/jpeg"]);

        assert_eq!(validate(&file(10, "image/png"), &config), None);

        let error = validate(&file(10, "image/gif"), &config).unwrap();
        assert_eq!(error.to_string(), "File type image/gif is not allowed");
    }

    #[test]
    fn test_size_checked_before_type() {
        let config = UploadConfig::new("http://localhost")
            .with_max_file_size(5)
            .with_allowed_types(["image/png"]);

        let error = validate(&file(10, "image/gif"), &config).unwrap();
        assert!(matches!(error, ValidationError::FileTooLarge { limit: 5 }));
    }
}
