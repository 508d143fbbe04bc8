use serde::Serialize;

/// Company slot, 0..=15
pub type CompanyId = u8;

/// Highest number of companies a game can hold
pub const MAX_COMPANIES: u8 = 16;

pub fn is_valid_company(id: CompanyId) -> bool {
    id < MAX_COMPANIES
}

/// A company read from the `PLYR` chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCompany {
    pub id: CompanyId,
    pub name: String,
    pub manager_name: String,
    pub money: i64,
    pub loan: i64,
    pub value: i64,
    pub performance: u16,
    pub inaugurated_year: i32,
    pub is_ai: bool,
    pub vehicles_count: u32,
}
