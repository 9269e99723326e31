use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::fmt;

use crate::error::{Result, ScrapeError};
use crate::models::PeriodOption;

static SELECT_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("select").expect("Invalid select selector"));
static OPTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("option").expect("Invalid option selector"));

/// Which `<select>` of a fragment to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectLocator {
    First,
    Id(String),
    Name(String),
}

impl fmt::Display for SelectLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectLocator::First => write!(f, "any select"),
            SelectLocator::Id(id) => write!(f, "select with id '{}'", id),
            SelectLocator::Name(name) => write!(f, "select with name '{}'", name),
        }
    }
}

/// Read the options of one `<select>` in document order.
///
/// Values are kept verbatim (an absent `value` attribute reads as an empty
/// string), labels are the visible text trimmed at both ends with inner
/// spacing kept, and `selected`/`disabled` reflect attribute presence.
pub fn extract_select_options(html: &str, locator: &SelectLocator) -> Result<Vec<PeriodOption>> {
    let fragment = Html::parse_fragment(html);

    let select = fragment
        .select(&SELECT_SELECTOR)
        .find(|element| match locator {
            SelectLocator::First => true,
            SelectLocator::Id(id) => element.value().id() == Some(id.as_str()),
            SelectLocator::Name(name) => element.value().attr("name") == Some(name.as_str()),
        })
        .ok_or_else(|| ScrapeError::NotFound(locator.to_string()))?;

    let options = select
        .select(&OPTION_SELECTOR)
        .map(|option| {
            let attrs = option.value();
            PeriodOption {
                value: attrs.attr("value").unwrap_or_default().to_string(),
                label: option.text().collect::<String>().trim().to_string(),
                selected: attrs.attr("selected").is_some(),
                disabled: attrs.attr("disabled").is_some(),
            }
        })
        .collect();

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SELECT_HTML: &str = r#"
        <div>
          <select name="other"><option value="x">X</option></select>
          <select id="CBOFiltro" name="CBOFiltro">
            <option value="">-- Seleccione --</option>
            <option value="202401" selected>  Enero   2024 </option>
            <option value="202402">Febrero 2024</option>
            <option disabled>Sin valor</option>
          </select>
        </div>"#;

    #[test]
    fn reads_options_of_select_by_id() {
        let options =
            extract_select_options(SELECT_HTML, &SelectLocator::Id("CBOFiltro".into())).unwrap();

        assert_eq!(options.len(), 4);
        assert_eq!(options[0].value, "");
        assert_eq!(options[0].label, "-- Seleccione --");
        assert_eq!(options[1].value, "202401");
        assert_eq!(options[1].label, "Enero   2024");
        assert!(options[1].selected);
        assert!(!options[2].selected);
        assert_eq!(options[3].value, "");
        assert!(options[3].disabled);
    }

    #[test]
    fn first_and_name_locators() {
        let first = extract_select_options(SELECT_HTML, &SelectLocator::First).unwrap();
        assert_eq!(first, vec![PeriodOption::new("x", "X")]);

        let by_name =
            extract_select_options(SELECT_HTML, &SelectLocator::Name("CBOFiltro".into())).unwrap();
        assert_eq!(by_name.len(), 4);
    }

    #[test]
    fn missing_select_names_the_criterion() {
        let err = extract_select_options(SELECT_HTML, &SelectLocator::Id("nope".into()))
            .unwrap_err();
        match err {
            ScrapeError::NotFound(msg) => assert!(msg.contains("'nope'")),
            other => panic!("unexpected error: {other}"),
        }

        let err = extract_select_options("<p>no select</p>", &SelectLocator::First).unwrap_err();
        assert!(matches!(err, ScrapeError::NotFound(_)));
    }
}
