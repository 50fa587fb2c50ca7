use std::error::Error;

pub(crate) fn check_significance(significance: f64) -> Result<(), Box<dyn Error>> {
    if !(significance > 0.0 && significance < 1.0) {
        return Err("The significance threshold must lie strictly between 0 and 1.".into());
    }
    Ok(())
}

#[derive(Clone, Debug)]
pub struct TreeParams {
    pub significance: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeParams {
    pub fn new() -> Self {
        Self { significance: 0.05 }
    }

    /// Sets the chi-square pruning threshold. Smaller values prune more aggressively.
    pub fn set_significance(&mut self, significance: f64) -> Result<(), Box<dyn Error>> {
        check_significance(significance)?;
        self.significance = significance;
        Ok(())
    }

    pub fn significance(&self) -> f64 {
        self.significance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        assert_eq!(TreeParams::default().significance(), 0.05);
    }

    #[test]
    fn test_set_significance() {
        let mut params = TreeParams::new();
        assert!(params.set_significance(0.5).is_ok());
        assert_eq!(params.significance(), 0.5);

        assert!(params.set_significance(0.0).is_err());
        assert!(params.set_significance(1.0).is_err());
        assert!(params.set_significance(f64::NAN).is_err());
        assert_eq!(params.significance(), 0.5);
    }
}
