use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

/// Marker some solver titles carry in front of the staple dish.
pub const LEADING_MARKER: char = '◎';

// Keyword tables for dishes the solver sends without a category label.
const SOUP_WORDS: [&str; 6] = ["スープ", "汁", "煮", "ポタージュ", "みそ汁", "すまし汁"];
const DESSERT_WORDS: [&str; 10] = [
    "ゼリー",
    "クレープ",
    "ヨーグルト",
    "ぽんかん",
    "りんご",
    "ひしもち",
    "ムース",
    "だんご",
    "まんじゅう",
    "豆",
];
const SALAD_WORDS: [&str; 6] = ["サラダ", "おひたし", "和え物", "ふりかけ", "ソテー", "たくあん"];
const DRINK_WORDS: [&str; 4] = ["牛乳", "ミルク", "ジュース", "飲料"];

#[derive(
    EnumString,
    Display,
    AsRefStr,
    VariantArray,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Main,
    Side,
    Salad,
    Soup,
    Dessert,
    Drink,
}

impl Category {
    /// Display rank within a calendar cell: staple first, milk last.
    pub const fn sort_rank(self) -> u8 {
        match self {
            Self::Main => 1,
            Self::Side => 2,
            Self::Salad => 3,
            Self::Soup => 4,
            Self::Dessert => 5,
            Self::Drink => 6,
        }
    }
}

/// One plan entry as it arrives from the solver, before classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMenuItem {
    pub name: String,
    pub source_category: Option<String>,
    pub item_id: Option<String>,
}

/// A classified dish as stored on a calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub display_name: String,
    pub category: Category,
    pub source_category: Option<String>,
    pub item_id: Option<String>,
}

/// Strips the staple marker from the front of a dish name.
pub fn strip_marker(name: &str) -> &str {
    name.strip_prefix(LEADING_MARKER).unwrap_or(name)
}

/// Classifies one day's dishes, then orders them for display.
///
/// The drink keywords win over everything, including a solver category
/// label. Labeled dishes map through the label table and never consume the
/// day's main slot. Unlabeled dishes fall through the keyword tables; the
/// first one nothing matches becomes the main dish, the rest side dishes.
/// The final sort is stable, so dishes of equal rank keep plan order.
pub fn classify_day(items: Vec<RawMenuItem>) -> Vec<MenuItem> {
    let mut main_assigned = false;

    let mut classified: Vec<MenuItem> = items
        .into_iter()
        .map(|item| {
            let display_name = strip_marker(&item.name).to_string();
            let category = categorize(
                &display_name,
                item.source_category.as_deref(),
                &mut main_assigned,
            );

            MenuItem {
                display_name,
                category,
                source_category: item.source_category,
                item_id: item.item_id,
            }
        })
        .collect();

    classified.sort_by_key(|item| item.category.sort_rank());
    classified
}

fn categorize(name: &str, source_category: Option<&str>, main_assigned: &mut bool) -> Category {
    if contains_any(name, &DRINK_WORDS) {
        return Category::Drink;
    }

    if let Some(label) = source_category {
        return backend_category(label);
    }

    if contains_any(name, &DESSERT_WORDS) {
        return Category::Dessert;
    }
    if contains_any(name, &SOUP_WORDS) {
        return Category::Soup;
    }
    if contains_any(name, &SALAD_WORDS) {
        return Category::Salad;
    }

    if !*main_assigned {
        *main_assigned = true;
        return Category::Main;
    }

    Category::Side
}

/// Category labels the solver attaches to catalog dishes.
fn backend_category(label: &str) -> Category {
    match label {
        "主食" => Category::Main,
        "主菜" => Category::Side,
        "副菜" => Category::Salad,
        "汁物" => Category::Soup,
        "デザート" => Category::Dessert,
        _ => Category::Side,
    }
}

fn contains_any(name: &str, words: &[&str]) -> bool {
    words.iter().any(|word| name.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> RawMenuItem {
        RawMenuItem {
            name: name.to_string(),
            source_category: None,
            item_id: None,
        }
    }

    fn labeled(name: &str, label: &str) -> RawMenuItem {
        RawMenuItem {
            name: name.to_string(),
            source_category: Some(label.to_string()),
            item_id: None,
        }
    }

    #[test]
    fn first_unmatched_dish_becomes_main_rest_side() {
        let day = classify_day(vec![named("とんかつ"), named("チキンカレー"), named("コロッケ")]);

        assert_eq!(day[0].category, Category::Main);
        assert_eq!(day[0].display_name, "とんかつ");
        assert_eq!(day[1].category, Category::Side);
        assert_eq!(day[2].category, Category::Side);
    }

    #[test]
    fn keywords_classify_unlabeled_dishes() {
        let day = classify_day(vec![
            named("わかめスープ"),
            named("いちごゼリー"),
            named("ごぼうサラダ"),
            named("牛乳"),
        ]);

        let categories: Vec<Category> = day.iter().map(|item| item.category).collect();
        assert_eq!(
            categories,
            vec![
                Category::Salad,
                Category::Soup,
                Category::Dessert,
                Category::Drink
            ]
        );
    }

    #[test]
    fn drink_keywords_override_solver_label() {
        let day = classify_day(vec![labeled("コーヒー牛乳", "デザート")]);

        assert_eq!(day[0].category, Category::Drink);
    }

    #[test]
    fn solver_labels_map_through_label_table() {
        let day = classify_day(vec![
            labeled("むぎごはん", "主食"),
            labeled("さばのみそ焼き", "主菜"),
            labeled("ほうれん草のごま和え", "副菜"),
            labeled("とん汁", "汁物"),
            labeled("フルーツポンチ", "デザート"),
            labeled("謎のおかず", "揚げ物"),
        ]);

        assert_eq!(day[0].category, Category::Main);
        assert_eq!(day[1].category, Category::Side);
        // The unknown label falls back to side and sorts behind the 主菜 dish.
        assert_eq!(day[2].display_name, "謎のおかず");
        assert_eq!(day[2].category, Category::Side);
        assert_eq!(day[3].category, Category::Salad);
        assert_eq!(day[4].category, Category::Soup);
        assert_eq!(day[5].category, Category::Dessert);
    }

    #[test]
    fn labeled_dishes_do_not_consume_the_main_slot() {
        let day = classify_day(vec![labeled("むぎごはん", "主食"), named("とんかつ")]);

        // Both end up rank 1; the labeled staple keeps plan order.
        assert_eq!(day[0].display_name, "むぎごはん");
        assert_eq!(day[0].category, Category::Main);
        assert_eq!(day[1].display_name, "とんかつ");
        assert_eq!(day[1].category, Category::Main);
    }

    #[test]
    fn leading_marker_is_always_stripped() {
        let day = classify_day(vec![labeled("◎むぎごはん", "主食"), named("◎コッペパン")]);

        assert_eq!(day[0].display_name, "むぎごはん");
        assert_eq!(day[1].display_name, "コッペパン");
    }

    #[test]
    fn dishes_of_equal_rank_keep_plan_order() {
        let day = classify_day(vec![
            named("みそ汁"),
            named("すまし汁"),
            named("わかめスープ"),
        ]);

        let names: Vec<&str> = day.iter().map(|item| item.display_name.as_str()).collect();
        assert_eq!(names, vec!["みそ汁", "すまし汁", "わかめスープ"]);
    }

    #[test]
    fn display_order_follows_category_rank() {
        let day = classify_day(vec![
            named("牛乳"),
            named("みかんゼリー"),
            named("みそ汁"),
            named("大根サラダ"),
            named("ごはん"),
            named("とんかつ"),
        ]);

        let names: Vec<&str> = day.iter().map(|item| item.display_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "ごはん",
                "とんかつ",
                "大根サラダ",
                "みそ汁",
                "みかんゼリー",
                "牛乳"
            ]
        );
    }

    #[test]
    fn empty_day_stays_empty() {
        assert!(classify_day(Vec::new()).is_empty());
    }
}
