//! Failure messages shown to sellers, one title + message per field.
//!
//! Messages take the grouper id (`{grouper}`), the sheet row number (`{row}`)
//! and, for divergence, the column header (`{field}`).

use super::{FailureKind, Field};
use crate::sheet::Column;

/// Placeholder used when the row has no grouper id.
const NO_GROUPER: &str = "(sem ID agrupador)";

/// Title and message pair for one failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageTemplate {
    pub title: &'static str,
    pub message: &'static str,
}

impl MessageTemplate {
    const fn new(title: &'static str, message: &'static str) -> Self {
        Self { title, message }
    }

    /// Fill the placeholders.
    pub fn render(&self, grouper_id: Option<&str>, row_number: usize, field: &str) -> String {
        self.message
            .replace("{grouper}", grouper_id.unwrap_or(NO_GROUPER))
            .replace("{row}", &row_number.to_string())
            .replace("{field}", field)
    }
}

const DIVERGENT: MessageTemplate = MessageTemplate::new(
    "Dados divergentes no agrupador",
    "A linha {row} do agrupador {grouper} tem \"{field}\" diferente da primeira linha do grupo.",
);

const INVALID_IMAGES: MessageTemplate = MessageTemplate::new(
    "Imagens obrigatórias",
    "O produto {grouper} (linha {row}) precisa de uma imagem de capa e ao menos uma imagem de detalhe.",
);

/// Template for a failure of the given kind on the given field.
pub fn template(field: Field, kind: FailureKind) -> MessageTemplate {
    if kind == FailureKind::Divergent {
        return DIVERGENT;
    }
    match field {
        Field::Images => INVALID_IMAGES,
        Field::Column(column) => column_template(column),
    }
}

fn column_template(column: Column) -> MessageTemplate {
    match column {
        Column::Category => MessageTemplate::new(
            "Categoria inválida",
            "Selecione nacionalidade, categoria e subcategoria do produto {grouper} (linha {row}).",
        ),
        Column::Name => MessageTemplate::new(
            "Nome obrigatório",
            "Informe o nome do produto {grouper} (linha {row}).",
        ),
        Column::Brand => MessageTemplate::new(
            "Marca obrigatória",
            "Informe a marca do produto {grouper} (linha {row}).",
        ),
        Column::GrouperId => MessageTemplate::new(
            "ID agrupador obrigatório",
            "A linha {row} não tem ID agrupador; não é possível saber a qual produto ela pertence.",
        ),
        Column::Size => MessageTemplate::new(
            "Tamanho obrigatório",
            "Informe o tamanho da variação do produto {grouper} (linha {row}).",
        ),
        Column::Color => MessageTemplate::new(
            "Cor/sabor obrigatório",
            "Informe a cor ou sabor da variação do produto {grouper} (linha {row}).",
        ),
        Column::Stock => MessageTemplate::new(
            "Quantidade inválida",
            "A quantidade do produto {grouper} (linha {row}) deve ser um número inteiro maior ou igual a zero.",
        ),
        Column::Description => MessageTemplate::new(
            "Descrição inválida",
            "A descrição do produto {grouper} (linha {row}) é obrigatória e deve ter no máximo 1800 caracteres.",
        ),
        Column::Sku => MessageTemplate::new(
            "SKU obrigatório",
            "Informe o SKU do produto {grouper} (linha {row}).",
        ),
        Column::Price => MessageTemplate::new(
            "Preço inválido",
            "Informe um preço válido para o produto {grouper} (linha {row}).",
        ),
        Column::DiscountPrice => MessageTemplate::new(
            "Preço promocional inválido",
            "O preço promocional do produto {grouper} (linha {row}) não é um número válido.",
        ),
        Column::Height | Column::Width | Column::Length => MessageTemplate::new(
            "Dimensões inválidas",
            "Informe altura, largura e comprimento da embalagem do produto {grouper} (linha {row}).",
        ),
        Column::Weight => MessageTemplate::new(
            "Peso inválido",
            "Informe o peso da embalagem do produto {grouper} (linha {row}).",
        ),
        Column::Gender => MessageTemplate::new(
            "Gênero obrigatório",
            "Informe o gênero do produto {grouper} (linha {row}).",
        ),
        _ => MessageTemplate::new(
            "Campo inválido",
            "O campo \"{field}\" do produto {grouper} (linha {row}) é inválido.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_placeholders() {
        let t = template(Field::Column(Column::Name), FailureKind::Invalid);
        assert_eq!(t.title, "Nome obrigatório");
        assert_eq!(
            t.render(Some("G1"), 4, "Nome do Produto"),
            "Informe o nome do produto G1 (linha 4)."
        );
    }

    #[test]
    fn test_missing_grouper_placeholder() {
        let t = template(Field::Column(Column::Brand), FailureKind::Invalid);
        assert!(t.render(None, 2, "Marca").contains(NO_GROUPER));
    }

    #[test]
    fn test_divergent_names_field() {
        let t = template(Field::Column(Column::Price), FailureKind::Divergent);
        let msg = t.render(Some("G7"), 9, "Preço");
        assert!(msg.contains("\"Preço\""));
        assert!(msg.contains("G7"));
        assert!(msg.contains("linha 9"));
    }
}
