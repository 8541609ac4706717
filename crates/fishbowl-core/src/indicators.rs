//! 순수 지표 계산.

use rust_decimal::Decimal;

/// 고정 구간 이동평균.
///
/// 입력과 같은 길이의 벡터를 돌려주며, 구간이 차기 전(`window - 1`개)의
/// 값은 `None`입니다.
pub fn rolling_mean(values: &[Decimal], window: usize) -> Vec<Option<Decimal>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    let divisor = Decimal::from(window as u64);
    let mut out = Vec::with_capacity(values.len());
    let mut sum = Decimal::ZERO;
    for (i, v) in values.iter().enumerate() {
        sum += *v;
        if i >= window {
            sum -= values[i - window];
        }
        if i + 1 >= window {
            out.push(Some(sum / divisor));
        } else {
            out.push(None);
        }
    }
    out
}
