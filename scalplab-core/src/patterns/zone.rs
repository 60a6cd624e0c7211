//! Premium/discount classification.
//!
//! Price well above fair value (slow EMA plus one ATR) trades at a
//! premium and favors selling; well below (minus one ATR) trades at a
//! discount and favors buying. Inside the band neither side has an edge.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneClass {
    Premium,
    Discount,
    Neutral,
}

pub fn classify(close: f64, ema_slow: Option<f64>, atr: Option<f64>) -> ZoneClass {
    let (ema, atr) = match (ema_slow, atr) {
        (Some(e), Some(a)) if a > 0.0 => (e, a),
        _ => return ZoneClass::Neutral,
    };
    if close > ema + atr {
        ZoneClass::Premium
    } else if close < ema - atr {
        ZoneClass::Discount
    } else {
        ZoneClass::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn above_band_is_premium() {
        assert_eq!(classify(105.0, Some(100.0), Some(2.0)), ZoneClass::Premium);
    }

    #[test]
    fn below_band_is_discount() {
        assert_eq!(classify(95.0, Some(100.0), Some(2.0)), ZoneClass::Discount);
    }

    #[test]
    fn inside_band_is_neutral() {
        assert_eq!(classify(101.0, Some(100.0), Some(2.0)), ZoneClass::Neutral);
        assert_eq!(classify(102.0, Some(100.0), Some(2.0)), ZoneClass::Neutral);
    }

    #[test]
    fn warmup_defaults_to_neutral() {
        assert_eq!(classify(105.0, None, Some(2.0)), ZoneClass::Neutral);
        assert_eq!(classify(105.0, Some(100.0), None), ZoneClass::Neutral);
    }
}
