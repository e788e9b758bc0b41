use crate::equity::EquityDataPoint;
use rust_decimal::Decimal;

/// Maximum peak-to-trough decline of the curve, in percent of the peak.
///
/// Returns 0 for curves with fewer than two points. Points reached while the peak is
/// zero or negative do not contribute. A decline too large to express as a percentage
/// of a tiny peak is reported as `Decimal::MAX`.
pub fn max_drawdown_percent(curve: &[EquityDataPoint]) -> Decimal {
    if curve.len() < 2 {
        return Decimal::ZERO;
    }

    let mut peak: Option<Decimal> = None;
    let mut max_drawdown = Decimal::ZERO;

    for point in curve {
        let peak_equity = match peak {
            Some(p) if p >= point.equity => p,
            _ => {
                peak = Some(point.equity);
                point.equity
            }
        };

        if peak_equity > Decimal::ZERO {
            let drawdown = peak_equity
                .checked_sub(point.equity)
                .and_then(|decline| decline.checked_div(peak_equity))
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
                .unwrap_or(Decimal::MAX);
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }
    }

    max_drawdown
}

/// Largest absolute decline from a running peak, in account currency.
pub fn max_drawdown_amount(curve: &[EquityDataPoint]) -> Decimal {
    let mut points = curve.iter();
    let Some(first) = points.next() else {
        return Decimal::ZERO;
    };

    let mut peak = first.equity;
    let mut max_drawdown = Decimal::ZERO;
    for point in points {
        if point.equity > peak {
            peak = point.equity;
        }
        let drawdown = peak.saturating_sub(point.equity);
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
        }
    }
    max_drawdown
}
