use serde::Serialize;

/// 自定义尺寸的哨兵ID（宽高由作业自带）
pub const CUSTOM_SHEET_ID: &str = "custom";

/// 标准纸张尺寸
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSize {
    pub id: &'static str,
    pub name: &'static str,
    pub width_mm: f64,
    pub height_mm: f64,
}

/// 标准尺寸目录（固定，不可编辑）
pub const SHEET_SIZES: [SheetSize; 6] = [
    SheetSize { id: "a6", name: "A6", width_mm: 105.0, height_mm: 148.0 },
    SheetSize { id: "a5", name: "A5", width_mm: 148.0, height_mm: 210.0 },
    SheetSize { id: "a4", name: "A4", width_mm: 210.0, height_mm: 297.0 },
    SheetSize { id: "a3", name: "A3", width_mm: 297.0, height_mm: 420.0 },
    SheetSize { id: "sra3", name: "SRA3", width_mm: 320.0, height_mm: 450.0 },
    SheetSize { id: CUSTOM_SHEET_ID, name: "Custom", width_mm: 0.0, height_mm: 0.0 },
];

/// 标准克重阶梯（升序）
pub const GSM_LADDER: [u32; 13] = [70, 80, 90, 100, 115, 130, 150, 170, 200, 230, 250, 300, 350];

/// 按ID查找尺寸（包含 custom 哨兵）
pub fn find_sheet_size(id: &str) -> Option<&'static SheetSize> {
    SHEET_SIZES.iter().find(|s| s.id == id)
}

/// 参与矩阵展示的标准尺寸（排除 custom）
pub fn standard_sheet_sizes() -> impl Iterator<Item = &'static SheetSize> {
    SHEET_SIZES.iter().filter(|s| s.id != CUSTOM_SHEET_ID)
}
