use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder};

pub(crate) const AMOUNT_FORMAT: &str = "#,##0.00";
pub(crate) const PERCENT_FORMAT: &str = "0.00%";
pub(crate) const DATE_FORMAT: &str = "dd.mm.yyyy";

const HEADER_BLUE: u32 = 0x4472C4;
const REVALUED_AMBER: u32 = 0xFFC000;
const TOTAL_BLUE: u32 = 0xD9E1F2;
const LIGHT_GREY: u32 = 0xE7E6E6;

/// Cell formats shared by the report sheets.
pub(crate) struct Styles {
    pub title: Format,
    pub info: Format,
    pub header: Format,
    pub banner: Format,
    pub bold: Format,
    pub column_header: Format,
    pub cell: Format,
    pub date: Format,
    pub amount: Format,
    pub percent: Format,
    pub revalued_amount: Format,
    pub revalued_percent: Format,
    pub total_label: Format,
    pub total_amount: Format,
    pub example: Format,
    pub example_date: Format,
    pub example_rate: Format,
    pub example_amount: Format,
}

impl Default for Styles {
    fn default() -> Self {
        Self::new()
    }
}

impl Styles {
    pub fn new() -> Self {
        let bordered = Format::new().set_border(FormatBorder::Thin);
        let amount = bordered.clone().set_num_format(AMOUNT_FORMAT);
        let percent = bordered.clone().set_num_format(PERCENT_FORMAT);
        let total = bordered
            .clone()
            .set_bold()
            .set_font_size(10)
            .set_background_color(Color::RGB(TOTAL_BLUE));
        let example = bordered.clone().set_background_color(Color::RGB(LIGHT_GREY));

        Self {
            title: Format::new().set_bold().set_font_size(14),
            info: Format::new().set_bold().set_font_size(11),
            header: bordered
                .clone()
                .set_bold()
                .set_font_size(11)
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(HEADER_BLUE))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_text_wrap(),
            banner: Format::new()
                .set_bold()
                .set_font_size(12)
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(HEADER_BLUE)),
            bold: Format::new().set_bold(),
            column_header: bordered
                .clone()
                .set_bold()
                .set_background_color(Color::RGB(LIGHT_GREY)),
            cell: bordered.clone(),
            date: bordered.clone().set_num_format(DATE_FORMAT),
            revalued_amount: amount
                .clone()
                .set_background_color(Color::RGB(REVALUED_AMBER)),
            revalued_percent: percent
                .clone()
                .set_background_color(Color::RGB(REVALUED_AMBER)),
            amount,
            percent,
            total_label: total.clone(),
            total_amount: total.set_num_format(AMOUNT_FORMAT),
            example_date: example.clone().set_num_format(DATE_FORMAT),
            example_rate: example.clone().set_num_format("0.00"),
            example_amount: example.clone().set_num_format(AMOUNT_FORMAT),
            example,
        }
    }
}

/// Spreadsheet column letter for columns A..Z.
pub(crate) fn column_letter(col: u16) -> char {
    char::from(b'A' + (col % 26) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), 'A');
        assert_eq!(column_letter(5), 'F');
        assert_eq!(column_letter(15), 'P');
    }

    #[test]
    fn test_default_matches_new() {
        let styles = Styles::default();
        assert_eq!(styles.amount, Styles::new().amount);
    }
}
