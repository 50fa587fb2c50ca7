//! Chi-square distribution tail probabilities and critical values.
use std::error::Error;

const BIG_X: f64 = 20.0;
const Z_MAX: f64 = 6.0;
const LOG_SQRT_PI: f64 = 0.572_364_942_924_700_087_071_713_5;
const I_SQRT_PI: f64 = 0.564_189_583_547_756_286_948_079_5;

const CHI_EPSILON: f64 = 0.000_001;
const CHI_MAX: f64 = 99_999.0;

fn ex(x: f64) -> f64 {
    if x < -BIG_X {
        0.0
    } else {
        x.exp()
    }
}

/// Standard normal cumulative distribution function (polynomial approximation).
pub fn normal_cdf(z: f64) -> f64 {
    let x = if z == 0.0 {
        0.0
    } else {
        let y = 0.5 * z.abs();
        if y >= Z_MAX * 0.5 {
            1.0
        } else if y < 1.0 {
            let w = y * y;
            ((((((((0.000_124_818_987 * w - 0.001_075_204_047) * w + 0.005_198_775_019) * w
                - 0.019_198_292_004)
                * w
                + 0.059_054_035_642)
                * w
                - 0.151_968_751_364)
                * w
                + 0.319_152_932_694)
                * w
                - 0.531_923_007_300)
                * w
                + 0.797_884_560_593)
                * y
                * 2.0
        } else {
            let y = y - 2.0;
            (((((((((((((-0.000_045_255_659 * y + 0.000_152_529_290) * y
                - 0.000_019_538_132)
                * y
                - 0.000_676_904_986)
                * y
                + 0.001_390_604_284)
                * y
                - 0.000_794_620_820)
                * y
                - 0.002_034_254_874)
                * y
                + 0.006_549_791_214)
                * y
                - 0.010_557_625_006)
                * y
                + 0.011_630_447_319)
                * y
                - 0.009_279_453_341)
                * y
                + 0.005_353_579_108)
                * y
                - 0.002_141_268_741)
                * y
                + 0.000_535_310_849)
                * y
                + 0.999_936_657_524
        }
    };

    if z > 0.0 {
        (x + 1.0) * 0.5
    } else {
        (1.0 - x) * 0.5
    }
}

/// Upper tail probability `P(X > x)` for a chi-square variable with `df` degrees of freedom.
///
/// Returns 1 for `x <= 0` or `df == 0`.
pub fn survival(x: f64, df: usize) -> f64 {
    if x <= 0.0 || df < 1 {
        return 1.0;
    }

    let a = 0.5 * x;
    let even = df % 2 == 0;
    let y = if df > 1 { ex(-a) } else { 0.0 };
    let mut s = if even { y } else { 2.0 * normal_cdf(-x.sqrt()) };

    if df <= 2 {
        return s;
    }

    let upper = 0.5 * (df as f64 - 1.0);
    let mut z = if even { 1.0 } else { 0.5 };

    if a > BIG_X {
        let mut e = if even { 0.0 } else { LOG_SQRT_PI };
        let c = a.ln();
        while z <= upper {
            e += z.ln();
            s += ex(c * z - a - e);
            z += 1.0;
        }
        s
    } else {
        let mut e = if even { 1.0 } else { I_SQRT_PI / a.sqrt() };
        let mut c = 0.0;
        while z <= upper {
            e *= a / z;
            c += e;
            z += 1.0;
        }
        c * y + s
    }
}

/// Critical value `x` with `P(X > x) = significance` for `df` degrees of freedom.
///
/// Found by bisection over `survival`. With zero degrees of freedom no statistic can be
/// significant, so `f64::INFINITY` is returned.
///
/// # Errors
///
/// Returns an error if `significance` lies outside the open interval (0, 1).
pub fn critical_value(significance: f64, df: usize) -> Result<f64, Box<dyn Error>> {
    if !(significance > 0.0 && significance < 1.0) {
        return Err(format!(
            "The significance threshold must lie strictly between 0 and 1, got {}.",
            significance
        )
        .into());
    }
    if df == 0 {
        return Ok(f64::INFINITY);
    }

    let mut min_chi = 0.0;
    let mut max_chi = CHI_MAX;
    let mut chi = df as f64 / significance.sqrt();

    while max_chi - min_chi > CHI_EPSILON {
        if survival(chi, df) < significance {
            max_chi = chi;
        } else {
            min_chi = chi;
        }
        chi = (max_chi + min_chi) * 0.5;
    }

    Ok(chi)
}
