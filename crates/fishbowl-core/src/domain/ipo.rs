//! 신규 상장/청약 알림 엔티티.

use serde::{Deserialize, Serialize};

/// 신규 청약 안내 한 건.
//
// 수집(스크래핑)은 외부 협력자 몫이고, 여기서는 발송 포맷에 필요한
// 필드만 담습니다. 시장별로 안내 항목이 달라서 상세 내용은 순서 있는
// (라벨, 값) 쌍으로 표현합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpoListing {
    /// 시장 구분 (예: 沪市主板, 可转债, 港股)
    pub market: String,
    /// 종목 이름
    pub name: String,
    /// 종목 코드
    pub code: String,
    /// 시장별 상세 항목 (라벨, 값) — 표시 순서 유지
    pub details: Vec<(String, String)>,
}
