//! The fixed 26-column import template.
//!
//! The importer reads cells by position and the exporter writes the same
//! headers back, so a sheet downloaded from the seller center can be edited
//! and uploaded again unchanged. Column order and header text are a
//! compatibility contract with every template already in sellers' hands.

use serde::{Deserialize, Serialize};

/// Number of columns in the template.
pub const COLUMN_COUNT: usize = 26;

/// Whether a column must be filled in for the row to import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement {
    Required,
    Optional,
}

impl Requirement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "Required",
            Self::Optional => "Optional",
        }
    }
}

/// One template column, in template order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Column {
    Category,
    Name,
    Brand,
    GrouperId,
    Size,
    Color,
    Stock,
    Description,
    Ean,
    Sku,
    Price,
    DiscountPrice,
    Height,
    Width,
    Length,
    Weight,
    Gender,
    LactoseFree,
    GlutenFree,
    Image1,
    Image2,
    Image3,
    Image4,
    Image5,
    Image6,
    ProductId,
}

/// Index → column table.
pub const COLUMNS: [Column; COLUMN_COUNT] = [
    Column::Category,
    Column::Name,
    Column::Brand,
    Column::GrouperId,
    Column::Size,
    Column::Color,
    Column::Stock,
    Column::Description,
    Column::Ean,
    Column::Sku,
    Column::Price,
    Column::DiscountPrice,
    Column::Height,
    Column::Width,
    Column::Length,
    Column::Weight,
    Column::Gender,
    Column::LactoseFree,
    Column::GlutenFree,
    Column::Image1,
    Column::Image2,
    Column::Image3,
    Column::Image4,
    Column::Image5,
    Column::Image6,
    Column::ProductId,
];

/// The six image slots, cover first.
pub const IMAGE_COLUMNS: [Column; 6] = [
    Column::Image1,
    Column::Image2,
    Column::Image3,
    Column::Image4,
    Column::Image5,
    Column::Image6,
];

/// Product-level columns. Every row of a group must agree on these.
pub const SHARED_COLUMNS: [Column; 20] = [
    Column::Category,
    Column::Name,
    Column::Brand,
    Column::Description,
    Column::Ean,
    Column::Sku,
    Column::Price,
    Column::DiscountPrice,
    Column::Height,
    Column::Width,
    Column::Length,
    Column::Weight,
    Column::Gender,
    Column::Image1,
    Column::Image2,
    Column::Image3,
    Column::Image4,
    Column::Image5,
    Column::Image6,
    Column::ProductId,
];

impl Column {
    /// Position in the template (0-based).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        COLUMNS.get(index).copied()
    }

    /// Header text as printed in the template.
    pub fn header(self) -> &'static str {
        match self {
            Self::Category => "Categoria",
            Self::Name => "Nome do Produto",
            Self::Brand => "Marca",
            Self::GrouperId => "ID Agrupador",
            Self::Size => "Tamanho",
            Self::Color => "Cor/Sabor",
            Self::Stock => "Quantidade",
            Self::Description => "Descrição",
            Self::Ean => "EAN",
            Self::Sku => "SKU",
            Self::Price => "Preço",
            Self::DiscountPrice => "Preço Promocional",
            Self::Height => "Altura da Embalagem (cm)",
            Self::Width => "Largura da Embalagem (cm)",
            Self::Length => "Comprimento da Embalagem (cm)",
            Self::Weight => "Peso da Embalagem (kg)",
            Self::Gender => "Gênero",
            Self::LactoseFree => "Sem Lactose",
            Self::GlutenFree => "Sem Glúten",
            Self::Image1 => "Imagem 1",
            Self::Image2 => "Imagem 2",
            Self::Image3 => "Imagem 3",
            Self::Image4 => "Imagem 4",
            Self::Image5 => "Imagem 5",
            Self::Image6 => "Imagem 6",
            Self::ProductId => "ID do Produto",
        }
    }

    pub fn requirement(self) -> Requirement {
        match self {
            Self::Ean
            | Self::DiscountPrice
            | Self::LactoseFree
            | Self::GlutenFree
            | Self::Image3
            | Self::Image4
            | Self::Image5
            | Self::Image6
            | Self::ProductId => Requirement::Optional,
            _ => Requirement::Required,
        }
    }

    pub fn is_image(self) -> bool {
        IMAGE_COLUMNS.contains(&self)
    }
}
