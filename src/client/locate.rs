// src/client/locate.rs

//! Job-id parsing and the locate-and-retry idiom shared by the small
//! clients. The façade does not hide the retry loop; callers drive it
//! explicitly and this module only supplies the pieces.

use crate::core::errors::BatchError;

/// Splits a command-line job identifier `seq[.server][@server]` into the
/// id sent to the server and the server named after `@`, if any.
///
/// The sequence part must start with a digit; a job-array id may carry a
/// bracketed index range immediately after the sequence number.
pub fn parse_job_id(job: &str) -> Result<(String, Option<String>), BatchError> {
    let (id_part, server_part) = match job.split_once('@') {
        Some((id, server)) => {
            if server.is_empty() || server.contains('@') {
                return Err(BatchError::InvalidJobId(job.to_string()));
            }
            (id, Some(server.to_string()))
        }
        None => (job, None),
    };

    if id_part.is_empty() || !id_part.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(BatchError::InvalidJobId(job.to_string()));
    }
    if id_part.contains(char::is_whitespace) {
        return Err(BatchError::InvalidJobId(job.to_string()));
    }
    Ok((id_part.to_string(), server_part))
}

/// Splits a destination `queue[@server]` the way `qstop` and friends take
/// them: either part may be empty, but a bare `@` is not a destination.
pub fn parse_destination(dest: &str) -> Result<(Option<String>, Option<String>), BatchError> {
    if dest.is_empty() {
        return Err(BatchError::InvalidDestination(dest.to_string()));
    }
    match dest.split_once('@') {
        Some((queue, server)) => {
            if server.is_empty() || server.contains('@') {
                return Err(BatchError::InvalidDestination(dest.to_string()));
            }
            let queue = (!queue.is_empty()).then(|| queue.to_string());
            Ok((queue, Some(server.to_string())))
        }
        None => Ok((Some(dest.to_string()), None)),
    }
}

/// True when an error is the unknown-job code that triggers the single
/// locate-and-retry pass in `qsig`/`qmsg`.
pub fn should_locate(err: &BatchError) -> bool {
    matches!(err, BatchError::UnknownJobId(_))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_job_ids() {
        assert_eq!(
            parse_job_id("123.svr@remote").unwrap(),
            ("123.svr".to_string(), Some("remote".to_string()))
        );
        assert_eq!(parse_job_id("123").unwrap(), ("123".to_string(), None));
        assert_eq!(
            parse_job_id("42[1-5].svr").unwrap(),
            ("42[1-5].svr".to_string(), None)
        );
        assert!(parse_job_id("job").is_err());
        assert!(parse_job_id("123@").is_err());
        assert!(parse_job_id("").is_err());
    }

    #[test]
    fn splits_destinations() {
        assert_eq!(
            parse_destination("workq@svr").unwrap(),
            (Some("workq".to_string()), Some("svr".to_string()))
        );
        assert_eq!(
            parse_destination("@svr").unwrap(),
            (None, Some("svr".to_string()))
        );
        assert_eq!(
            parse_destination("workq").unwrap(),
            (Some("workq".to_string()), None)
        );
        assert!(parse_destination("").is_err());
        assert!(parse_destination("q@").is_err());
    }
}
