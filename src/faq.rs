//! Rule-based FAQ synthesis.
//!
//! Every question is gated on the presence of its triggering field, so a
//! generated FAQ can never claim something the record does not say. The
//! generation order is fixed and the output is capped per level; repeated
//! calls over the same input produce the same list.

use crate::aggregate::DestinationAggregate;
use crate::seo::{format_price, truncate_chars};
use crate::store::{HolidayPackage, TourProduct};

/// Cap for FAQs derived from a single package or tour record.
pub const RECORD_FAQ_CAP: usize = 10;

/// Cap for FAQs derived from a destination aggregate.
pub const DESTINATION_FAQ_CAP: usize = 12;

/// How many list entries an answer spells out before "and more".
const ANSWER_LIST_CAP: usize = 6;

/// One question/answer pair, ready for the FAQ accordion and FAQPage
/// JSON-LD. Text is raw here; escaping happens in the builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

impl FaqItem {
    fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// FAQs for one holiday package.
///
/// Question order is part of the contract: duration, price, accommodation,
/// inclusions, insurance, exclusions, taxes, check-in/out, confirmation,
/// destination. Each is emitted only when its backing field is present.
pub fn package_faqs(pkg: &HolidayPackage) -> Vec<FaqItem> {
    let mut faqs = Vec::new();

    if let Some(duration) = present(pkg.duration.as_deref()) {
        faqs.push(FaqItem::new(
            format!("How long is the {} holiday?", pkg.title),
            format!("{} lasts {duration}.", pkg.title),
        ));
    }

    if let Some(price) = pkg.price.filter(|p| *p > 0.0) {
        faqs.push(FaqItem::new(
            format!("How much does {} cost?", pkg.title),
            format!(
                "Prices start from {} per person.",
                format_price(price, pkg.currency.as_deref())
            ),
        ));
    }

    let hotels: Vec<&str> = pkg
        .accommodations
        .iter()
        .map(|h| h.trim())
        .filter(|h| !h.is_empty())
        .collect();
    if !hotels.is_empty() {
        faqs.push(FaqItem::new(
            "Where will I stay on this holiday?",
            format!("Accommodation is at {}.", join_natural(&hotels)),
        ));
    }

    if let Some(answer) = list_answer(&pkg.inclusions) {
        faqs.push(FaqItem::new(
            "What is included in the price?",
            format!("The price includes {answer}."),
        ));
    }

    // Insurance and tax questions fire on the free-text important
    // information mentioning them, and quote the relevant sentence.
    if let Some(sentence) = sentence_mentioning(pkg.other_info.as_deref(), "insurance") {
        faqs.push(FaqItem::new("Is travel insurance included?", sentence));
    }

    if let Some(answer) = list_answer(&pkg.exclusions) {
        faqs.push(FaqItem::new(
            "What is not included?",
            format!("The price does not include {answer}."),
        ));
    }

    if let Some(sentence) = sentence_mentioning(pkg.other_info.as_deref(), "tax") {
        faqs.push(FaqItem::new("Are taxes and fees included?", sentence));
    }

    if let Some(answer) = check_in_out_answer(pkg.check_in.as_deref(), pkg.check_out.as_deref()) {
        faqs.push(FaqItem::new(
            "What are the check-in and check-out times?",
            answer,
        ));
    }

    if let Some(confirmation) = present(pkg.confirmation.as_deref()) {
        faqs.push(FaqItem::new(
            "When is my booking confirmed?",
            format!("Bookings are confirmed {confirmation}."),
        ));
    }

    if let Some(category) = present(pkg.category.as_deref()) {
        faqs.push(FaqItem::new(
            "Where does this holiday take place?",
            format!("{} takes place in {category}.", pkg.title),
        ));
    }

    faqs.truncate(RECORD_FAQ_CAP);
    faqs
}

/// FAQs for one third-party tour product.
///
/// Products carry fewer fields than packages; the rule chain is the subset
/// that applies, in the same relative order.
pub fn product_faqs(product: &TourProduct) -> Vec<FaqItem> {
    let mut faqs = Vec::new();

    if let Some(days) = product.duration_days.filter(|d| *d > 0) {
        let length = if days == 1 {
            "1 day".to_string()
        } else {
            format!("{days} days")
        };
        faqs.push(FaqItem::new(
            format!("How long is {}?", product.name),
            format!("{} lasts {length}.", product.name),
        ));
    }

    if let Some(price) = product.price.filter(|p| *p > 0.0) {
        faqs.push(FaqItem::new(
            format!("How much does {} cost?", product.name),
            format!(
                "Prices start from {} per person.",
                format_price(price, product.currency.as_deref())
            ),
        ));
    }

    if let Some(answer) = list_answer(&product.inclusions) {
        faqs.push(FaqItem::new(
            "What is included in the price?",
            format!("The price includes {answer}."),
        ));
    }

    if let Some(answer) = list_answer(&product.exclusions) {
        faqs.push(FaqItem::new(
            "What is not included?",
            format!("The price does not include {answer}."),
        ));
    }

    if let Some(destination) = present(product.destination.as_deref()) {
        faqs.push(FaqItem::new(
            format!("Where does {} take place?", product.name),
            format!("{} takes place in {destination}.", product.name),
        ));
    }

    faqs.truncate(RECORD_FAQ_CAP);
    faqs
}

/// FAQs for a destination page, driven by the aggregate.
///
/// Order: package count, price range, typical durations, common
/// inclusions, popular hotels, departure months, travel styles, offers.
pub fn destination_faqs(agg: &DestinationAggregate) -> Vec<FaqItem> {
    let mut faqs = Vec::new();
    let name = agg.destination.as_str();

    if agg.package_count > 0 {
        let packages = if agg.package_count == 1 {
            "package".to_string()
        } else {
            format!("{} packages", agg.package_count)
        };
        faqs.push(FaqItem::new(
            format!("How many {name} holidays are available?"),
            format!("There are currently {packages} featuring {name}."),
        ));
    }

    if let (Some(min), Some(median), Some(max)) = (agg.price_min, agg.price_median, agg.price_max)
    {
        let currency = agg.currency.as_deref();
        faqs.push(FaqItem::new(
            format!("How much does a {name} holiday cost?"),
            format!(
                "Prices range from {} to {} per person, with a typical price around {}.",
                format_price(min, currency),
                format_price(max, currency),
                format_price(median, currency)
            ),
        ));
    }

    if !agg.typical_durations.is_empty() {
        let labels: Vec<&str> = agg.typical_durations.iter().map(String::as_str).collect();
        faqs.push(FaqItem::new(
            format!("How long do most {name} holidays last?"),
            format!("Most {name} packages run for {}.", labels.join(" or ")),
        ));
    }

    if !agg.top_inclusions.is_empty() {
        let phrases: Vec<&str> = agg
            .top_inclusions
            .iter()
            .take(ANSWER_LIST_CAP)
            .map(|i| i.phrase.as_str())
            .collect();
        faqs.push(FaqItem::new(
            format!("What is usually included in a {name} package?"),
            format!("Most packages include {}.", join_natural(&phrases)),
        ));
    }

    if !agg.top_hotels.is_empty() {
        let hotels: Vec<&str> = agg.top_hotels.iter().map(String::as_str).collect();
        faqs.push(FaqItem::new(
            format!("Which hotels are popular in {name}?"),
            format!("Popular stays include {}.", join_natural(&hotels)),
        ));
    }

    if !agg.departure_months.is_empty() {
        let months: Vec<&str> = agg.departure_months.iter().map(String::as_str).collect();
        faqs.push(FaqItem::new(
            format!("When is the best time to visit {name}?"),
            format!("Scheduled departures run in {}.", join_natural(&months)),
        ));
    }

    if !agg.top_tags.is_empty() {
        let tags: Vec<&str> = agg.top_tags.iter().map(String::as_str).collect();
        faqs.push(FaqItem::new(
            format!("What kinds of {name} holidays are available?"),
            format!("{name} packages cover {}.", join_natural(&tags)),
        ));
    }

    if agg.special_offer_count > 0 {
        let offers = if agg.special_offer_count == 1 {
            "1 package currently carries".to_string()
        } else {
            format!("{} packages currently carry", agg.special_offer_count)
        };
        faqs.push(FaqItem::new(
            format!("Are there special offers on {name} holidays?"),
            format!("Yes, {offers} a special offer."),
        ));
    }

    faqs.truncate(DESTINATION_FAQ_CAP);
    faqs
}

// ── Answer helpers ──────────────────────────────────────────────

fn present(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

/// "a, b and c", with "and more" past the listing cap.
fn join_natural(items: &[&str]) -> String {
    let shown = &items[..items.len().min(ANSWER_LIST_CAP)];
    let mut text = match shown {
        [] => return String::new(),
        [only] => (*only).to_string(),
        [head @ .., last] => format!("{} and {last}", head.join(", ")),
    };
    if items.len() > ANSWER_LIST_CAP {
        text.push_str(" and more");
    }
    text
}

fn list_answer(items: &[String]) -> Option<String> {
    let cleaned: Vec<&str> = items
        .iter()
        .map(|i| i.trim().trim_end_matches('.'))
        .filter(|i| !i.is_empty())
        .collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(join_natural(&cleaned))
    }
}

/// The first sentence of `text` containing `needle` (case-insensitive),
/// trimmed and capped. Falls back to the whole capped text when sentence
/// splitting finds nothing.
fn sentence_mentioning(text: Option<&str>, needle: &str) -> Option<String> {
    let text = present(text)?;
    if !text.to_lowercase().contains(needle) {
        return None;
    }
    let sentence = text
        .split_inclusive(['.', '!', '?'])
        .map(str::trim)
        .find(|s| s.to_lowercase().contains(needle))
        .unwrap_or(text);
    Some(truncate_chars(sentence, 300))
}

fn check_in_out_answer(check_in: Option<&str>, check_out: Option<&str>) -> Option<String> {
    match (present(check_in), present(check_out)) {
        (Some(ci), Some(co)) => Some(format!("Check-in is from {ci}; check-out is by {co}.")),
        (Some(ci), None) => Some(format!("Check-in is from {ci}.")),
        (None, Some(co)) => Some(format!("Check-out is by {co}.")),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::DestinationAggregate;

    fn full_package() -> HolidayPackage {
        HolidayPackage {
            id: 1,
            slug: "rome-city-break".to_string(),
            title: "Rome City Break".to_string(),
            category: Some("Italy".to_string()),
            price: Some(499.0),
            currency: Some("GBP".to_string()),
            duration: Some("3 nights".to_string()),
            inclusions: vec!["Return flights".to_string(), "Daily breakfast".to_string()],
            exclusions: vec!["City tax".to_string()],
            accommodations: vec!["Hotel Flora".to_string()],
            other_info: Some(
                "Travel insurance is not included and must be arranged separately. \
                 A city tax of around €6 per night is payable locally."
                    .to_string(),
            ),
            check_in: Some("15:00".to_string()),
            check_out: Some("11:00".to_string()),
            confirmation: Some("within 24 hours".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_package_emits_all_questions_in_order() {
        let faqs = package_faqs(&full_package());
        let questions: Vec<&str> = faqs.iter().map(|f| f.question.as_str()).collect();
        assert_eq!(
            questions,
            vec![
                "How long is the Rome City Break holiday?",
                "How much does Rome City Break cost?",
                "Where will I stay on this holiday?",
                "What is included in the price?",
                "Is travel insurance included?",
                "What is not included?",
                "Are taxes and fees included?",
                "What are the check-in and check-out times?",
                "When is my booking confirmed?",
                "Where does this holiday take place?",
            ]
        );
        assert!(faqs.len() <= RECORD_FAQ_CAP);
    }

    #[test]
    fn test_generation_is_idempotent() {
        let pkg = full_package();
        assert_eq!(package_faqs(&pkg), package_faqs(&pkg));
    }

    #[test]
    fn test_absent_fields_emit_no_questions() {
        let pkg = HolidayPackage {
            id: 2,
            slug: "mystery".to_string(),
            title: "Mystery Escape".to_string(),
            ..Default::default()
        };
        assert!(package_faqs(&pkg).is_empty());
    }

    #[test]
    fn test_insurance_question_requires_the_substring() {
        let mut pkg = full_package();
        pkg.other_info = Some("A city tax applies.".to_string());
        let faqs = package_faqs(&pkg);
        assert!(faqs.iter().all(|f| f.question != "Is travel insurance included?"));
        assert!(faqs.iter().any(|f| f.question == "Are taxes and fees included?"));
    }

    #[test]
    fn test_insurance_answer_quotes_the_relevant_sentence() {
        let faqs = package_faqs(&full_package());
        let insurance = faqs
            .iter()
            .find(|f| f.question == "Is travel insurance included?")
            .unwrap();
        assert_eq!(
            insurance.answer,
            "Travel insurance is not included and must be arranged separately."
        );
    }

    #[test]
    fn test_insurance_trigger_is_case_insensitive() {
        let mut pkg = full_package();
        pkg.other_info = Some("INSURANCE is mandatory".to_string());
        assert!(package_faqs(&pkg)
            .iter()
            .any(|f| f.question == "Is travel insurance included?"));
    }

    #[test]
    fn test_zero_price_emits_no_price_question() {
        let mut pkg = full_package();
        pkg.price = Some(0.0);
        assert!(package_faqs(&pkg)
            .iter()
            .all(|f| f.question != "How much does Rome City Break cost?"));
    }

    #[test]
    fn test_check_in_only() {
        let mut pkg = full_package();
        pkg.check_out = None;
        let faqs = package_faqs(&pkg);
        let answer = &faqs
            .iter()
            .find(|f| f.question == "What are the check-in and check-out times?")
            .unwrap()
            .answer;
        assert_eq!(answer, "Check-in is from 15:00.");
    }

    #[test]
    fn test_product_faqs_use_day_lengths() {
        let product = TourProduct {
            id: "T-9".to_string(),
            name: "Amalfi Coast Drive".to_string(),
            duration_days: Some(1),
            price: Some(89.0),
            currency: Some("GBP".to_string()),
            destination: Some("Italy".to_string()),
            ..Default::default()
        };
        let faqs = product_faqs(&product);
        assert_eq!(faqs[0].answer, "Amalfi Coast Drive lasts 1 day.");
        assert_eq!(faqs[1].answer, "Prices start from £89 per person.");
        assert_eq!(
            faqs.last().unwrap().answer,
            "Amalfi Coast Drive takes place in Italy."
        );
    }

    #[test]
    fn test_destination_faqs_from_aggregate() {
        let packages: Vec<HolidayPackage> = vec![
            HolidayPackage {
                id: 1,
                slug: "a".into(),
                title: "A".into(),
                category: Some("Italy".into()),
                price: Some(800.0),
                currency: Some("GBP".into()),
                duration: Some("7 nights".into()),
                inclusions: vec!["Return flights".into()],
                special_offer: true,
                ..Default::default()
            },
            HolidayPackage {
                id: 2,
                slug: "b".into(),
                title: "B".into(),
                category: Some("Italy".into()),
                price: Some(1200.0),
                currency: Some("GBP".into()),
                duration: Some("7 nights".into()),
                inclusions: vec!["Return flights".into()],
                ..Default::default()
            },
        ];
        let agg = DestinationAggregate::build("Italy", &packages);
        let faqs = destination_faqs(&agg);

        assert_eq!(faqs[0].question, "How many Italy holidays are available?");
        assert_eq!(
            faqs[1].answer,
            "Prices range from £800 to £1,200 per person, with a typical price around £1,000."
        );
        assert!(faqs
            .iter()
            .any(|f| f.answer == "Most Italy packages run for 5–7 nights."));
        assert!(faqs
            .iter()
            .any(|f| f.answer == "Yes, 1 package currently carries a special offer."));
        assert!(faqs.len() <= DESTINATION_FAQ_CAP);
    }

    #[test]
    fn test_empty_aggregate_emits_nothing() {
        let agg = DestinationAggregate::build("Atlantis", &[]);
        assert!(destination_faqs(&agg).is_empty());
    }

    #[test]
    fn test_join_natural() {
        assert_eq!(join_natural(&["a"]), "a");
        assert_eq!(join_natural(&["a", "b"]), "a and b");
        assert_eq!(join_natural(&["a", "b", "c"]), "a, b and c");
        assert_eq!(
            join_natural(&["a", "b", "c", "d", "e", "f", "g"]),
            "a, b, c, d, e and f and more"
        );
    }
}
