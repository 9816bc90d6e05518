//! schema.org microdata, folded into the same JSON shape JSON-LD produces so
//! the accessors only deal with one representation.

use scraper::{ElementRef, Html, Selector};
use serde_json::{Map, Value};

/// Properties that are lists even when the page marks up a single element.
const LIST_PROPERTIES: &[&str] = &["recipeIngredient", "ingredients"];

pub fn find_recipe(document: &Html) -> Option<Value> {
    let recipe_selector =
        Selector::parse(r#"[itemscope][itemtype$="schema.org/Recipe"]"#).expect("Invalid selector");
    let prop_selector = Selector::parse("[itemprop]").expect("Invalid selector");

    let recipe = document.select(&recipe_selector).next()?;
    let mut node = Map::new();
    node.insert("@type".to_string(), Value::String("Recipe".to_string()));

    for element in recipe.select(&prop_selector) {
        if !belongs_to(&element, &recipe) {
            continue;
        }
        let Some(props) = element.value().attr("itemprop") else {
            continue;
        };
        let value = property_value(&element);
        if value.is_empty() {
            continue;
        }

        // itemprop may hold several space-separated names
        for prop in props.split_whitespace() {
            push_value(&mut node, prop, value.clone());
        }
    }

    Some(Value::Object(node))
}

/// True when the nearest enclosing item scope of `element` is `scope`, so
/// properties of nested items (an author's `name`, say) are not mistaken for
/// the recipe's own.
fn belongs_to(element: &ElementRef, scope: &ElementRef) -> bool {
    for ancestor in element.ancestors() {
        if ancestor.id() == scope.id() {
            return true;
        }
        let opens_scope = ancestor
            .value()
            .as_element()
            .is_some_and(|e| e.attr("itemscope").is_some());
        if opens_scope {
            return false;
        }
    }
    false
}

fn property_value(element: &ElementRef) -> String {
    let el = element.value();

    // A nested HowToStep carries its text in an inner itemprop="text"
    if el.attr("itemscope").is_some() {
        if let Ok(text_selector) = Selector::parse(r#"[itemprop="text"]"#) {
            if let Some(text_el) = element.select(&text_selector).next() {
                return text_el.text().collect::<String>().trim().to_string();
            }
        }
    }

    let attr_value = match el.name() {
        "img" | "source" => el.attr("src").or_else(|| el.attr("data-src")),
        "a" | "link" => el.attr("href"),
        "time" => el.attr("datetime"),
        _ => None,
    };

    attr_value
        .or_else(|| el.attr("content"))
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| element.text().collect::<String>().trim().to_string())
}

fn push_value(node: &mut Map<String, Value>, prop: &str, value: String) {
    let value = Value::String(value);
    match node.get_mut(prop) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None if LIST_PROPERTIES.contains(&prop) => {
            node.insert(prop.to_string(), Value::Array(vec![value]));
        }
        None => {
            node.insert(prop.to_string(), value);
        }
    }
}
