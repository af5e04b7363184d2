use crate::error::HealthError;
use serde::{Deserialize, Serialize};
use validation::{Checks, FieldReader, FromForm, Validate, ValidationErrors};

/// Successive RR intervals in milliseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RmssdParams {
    pub rr_intervals_ms: Vec<f64>,
}

impl Validate for RmssdParams {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut checks = Checks::new();
        checks
            .min_len("rr_intervals_ms", &self.rr_intervals_ms, 2)
            .ensure(
                self.rr_intervals_ms.iter().all(|rr| *rr > 0.0 && *rr <= 5000.0),
                "rr_intervals_ms",
                "every interval must be between 0 and 5000 ms",
            );
        checks.finish()
    }
}

impl FromForm for RmssdParams {
    fn read(reader: &mut FieldReader<'_>) -> Self {
        Self {
            rr_intervals_ms: reader.number_list("rr_intervals_ms"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HrvResult {
    pub rmssd_ms: f64,
    /// Natural log of RMSSD; undefined when every interval is equal.
    pub ln_rmssd: Option<f64>,
    pub mean_rr_ms: f64,
}

/// Root mean square of successive RR differences.
pub fn rmssd(params: &RmssdParams) -> Result<HrvResult, HealthError> {
    let rr = &params.rr_intervals_ms;
    if rr.len() < 2 {
        return Err(HealthError::Calculation(
            "at least two RR intervals are required".to_string(),
        ));
    }

    let squared: f64 = rr.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
    let rmssd_ms = (squared / (rr.len() - 1) as f64).sqrt();
    let ln_rmssd = (rmssd_ms > 0.0).then(|| rmssd_ms.ln());
    let mean_rr_ms = rr.iter().sum::<f64>() / rr.len() as f64;

    tracing::debug!(beats = rr.len(), rmssd_ms, "RMSSD computed");
    Ok(HrvResult {
        rmssd_ms,
        ln_rmssd,
        mean_rr_ms,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use validation::FormInput;

    #[test]
    fn known_series() {
        // Differences 20, -10, 30: sqrt((400 + 100 + 900) / 3)
        let result = rmssd(&RmssdParams {
            rr_intervals_ms: vec![800.0, 820.0, 810.0, 840.0],
        })
        .unwrap();
        assert!((result.rmssd_ms - 21.6025).abs() < 1e-4);
        assert!((result.ln_rmssd.unwrap() - 3.0728).abs() < 1e-4);
        assert_eq!(result.mean_rr_ms, 817.5);
    }

    #[test]
    fn constant_rhythm_has_no_log() {
        let result = rmssd(&RmssdParams {
            rr_intervals_ms: vec![1000.0, 1000.0, 1000.0],
        })
        .unwrap();
        assert_eq!(result.rmssd_ms, 0.0);
        assert!(result.ln_rmssd.is_none());
    }

    #[test]
    fn single_interval_is_rejected() {
        let form = FormInput::new().with("rr_intervals_ms", "812");
        assert!(RmssdParams::from_form(&form).is_err());
        let err = rmssd(&RmssdParams {
            rr_intervals_ms: vec![812.0],
        });
        assert!(matches!(err, Err(HealthError::Calculation(_))));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let form = FormInput::new().with("rr_intervals_ms", "800, 0, 790");
        assert!(RmssdParams::from_form(&form).is_err());
    }
}
