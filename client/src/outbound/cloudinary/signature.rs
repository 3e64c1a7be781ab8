//! Client-side signing of upload parameters.

use chrono::{DateTime, Utc};
use sha1::{Digest, Sha1};

/// Signature for a folder upload: the lowercase hex SHA-1 of
/// `folder=<folder>&timestamp=<timestamp>` followed by the API secret.
///
/// # Examples
/// ```
/// use land_registry::outbound::cloudinary::sign_upload;
///
/// assert_eq!(
///     sign_upload("land-management", 1_700_000_000, "abcd"),
///     "1b8ec2eac526195956933bd1b0cc2b18a0bdd733",
/// );
/// ```
pub fn sign_upload(folder: &str, timestamp: i64, api_secret: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(format!("folder={folder}&timestamp={timestamp}").as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

/// Unix seconds for `now`, rounded to the nearest second.
pub fn upload_timestamp(now: DateTime<Utc>) -> i64 {
    (now.timestamp_millis() + 500).div_euclid(1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    #[test]
    fn signs_owner_folders() {
        assert_eq!(
            sign_upload(
                "land-management/contract-documents/3fa85f64-5717-4562-b3fc-2c963f66afa6",
                1_704_153_600,
                "test-secret",
            ),
            "25a77c48b35f84bd7050225ae2f902cc5353318e"
        );
    }

    #[rstest]
    #[case(0, 1_704_153_600)]
    #[case(499, 1_704_153_600)]
    #[case(500, 1_704_153_601)]
    fn timestamps_round_to_the_nearest_second(#[case] millis: u32, #[case] expected: i64) {
        let now = Utc
            .with_ymd_and_hms(2024, 1, 2, 0, 0, 0)
            .single()
            .expect("timestamp")
            + chrono::Duration::milliseconds(i64::from(millis));
        assert_eq!(upload_timestamp(now), expected);
    }
}
