//! Response validation beyond what serde enforces

use validator::Validate;

use crate::error::{ApiContractError, ApiContractResult};
use crate::types::{ResurrectionResult, ScanReport, ScanRequest};

/// Check a scan request before it leaves the client
pub fn validate_scan_request(request: &ScanRequest) -> ApiContractResult<()> {
    request.validate()?;
    Ok(())
}

/// Check a scan report received from the engine
pub fn validate_scan_report(report: &ScanReport) -> ApiContractResult<()> {
    report.validate()?;

    let health = &report.dependency_health;
    if health.outdated > health.total {
        return Err(ApiContractError::Inconsistent(format!(
            "{} outdated dependencies reported out of {}",
            health.outdated, health.total
        )));
    }

    Ok(())
}

/// Check a resurrection result received from the engine
pub fn validate_resurrection_result(result: &ResurrectionResult) -> ApiContractResult<()> {
    let modernization = &result.modernization;
    if modernization.file_names.len() > modernization.files_changed as usize {
        return Err(ApiContractError::Inconsistent(format!(
            "{} file names listed for {} changed files",
            modernization.file_names.len(),
            modernization.files_changed
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::*;

    fn report(score: u32) -> ScanReport {
        ScanReport {
            repo_url: None,
            local_path: "/tmp/x".into(),
            project_name: "repo".into(),
            resurrection_score: score,
            dependency_health: DependencyHealth {
                total: 2,
                outdated: 1,
                details: vec![],
            },
        }
    }

    #[test]
    fn test_score_bounds() {
        assert!(validate_scan_report(&report(0)).is_ok());
        assert!(validate_scan_report(&report(100)).is_ok());
        assert!(matches!(
            validate_scan_report(&report(101)),
            Err(ApiContractError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_local_path_rejected() {
        let mut r = report(50);
        r.local_path.clear();
        assert!(validate_scan_report(&r).is_err());
    }

    #[test]
    fn test_outdated_exceeding_total_rejected() {
        let mut r = report(50);
        r.dependency_health.outdated = 3;
        assert!(matches!(
            validate_scan_report(&r),
            Err(ApiContractError::Inconsistent(_))
        ));
    }

    #[test]
    fn test_scan_request_requires_locator() {
        assert!(validate_scan_request(&ScanRequest { url: String::new() }).is_err());
        assert!(validate_scan_request(&ScanRequest {
            url: "example/repo".into()
        })
        .is_ok());
    }

    #[test]
    fn test_file_names_exceeding_count_rejected() {
        let result = ResurrectionResult {
            modernization: ModernizationOutcome {
                files_changed: 1,
                file_names: vec!["a.ts".into(), "b.ts".into()],
                replacements: 2,
            },
            ..Default::default()
        };
        assert!(validate_resurrection_result(&result).is_err());
    }
}
