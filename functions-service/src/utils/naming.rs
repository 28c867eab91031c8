use chrono::Utc;
use rand::Rng;

const SUFFIX_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const SUFFIX_LEN: usize = 8;

/// Collision-resistant object name: `{prefix}-{unix_millis}-{random8}.{ext}`.
pub fn unique_object_name(prefix: &str, extension: &str) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| SUFFIX_CHARSET[rng.gen_range(0..SUFFIX_CHARSET.len())] as char)
        .collect();

    format!(
        "{}-{}-{}.{}",
        prefix,
        Utc::now().timestamp_millis(),
        suffix,
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_has_prefix_timestamp_and_suffix() {
        let name = unique_object_name("generated", "png");
        let stem = name.strip_suffix(".png").unwrap();
        let parts: Vec<&str> = stem.split('-').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "generated");
        assert!(parts[1].parse::<i64>().unwrap() > 0);
        assert_eq!(parts[2].len(), SUFFIX_LEN);
        assert!(parts[2].bytes().all(|b| SUFFIX_CHARSET.contains(&b)));
    }

    #[test]
    fn consecutive_names_differ() {
        assert_ne!(
            unique_object_name("edited", "png"),
            unique_object_name("edited", "png")
        );
    }
}
