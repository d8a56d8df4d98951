use grapher_rs::colors::{ColorCache, ColorKey, Rgb8, assign_colors, brighten_color};
use grapher_rs::{Series, TimePoint};
use std::collections::HashMap;

fn series(id: &str) -> Series {
    Series::new(id, format!("Series {id}"), vec![TimePoint::new(2000, 2000.0, 1.0)])
}

#[test]
fn explicit_color_is_brightened_for_repeats() {
    let mut list = vec![series("7-1"), series("7-2")];
    let explicit = HashMap::from([(7, "#ff0000".to_string())]);
    let mut cache = ColorCache::seeded(1);

    assign_colors(&mut list, &explicit, &mut cache);

    assert_eq!(list[0].color.as_deref(), Some("#ff0000"));
    let second = list[1].color.clone().unwrap();
    assert_ne!(second, "#ff0000");
    let base = Rgb8::from_hex("#ff0000").unwrap();
    let brighter = Rgb8::from_hex(&second).unwrap();
    assert!(brighter.luminance() > base.luminance(), "{second} is not brighter");
    // Explicit colors never populate the cache.
    assert!(cache.is_empty());
}

#[test]
fn third_repeat_is_brighter_than_second() {
    let two = Rgb8::from_hex(&brighten_color("#336699", 1)).unwrap();
    let three = Rgb8::from_hex(&brighten_color("#336699", 2)).unwrap();
    assert!(three.luminance() > two.luminance());
}

#[test]
fn cached_color_is_stable_across_calls() {
    let mut cache = ColorCache::seeded(42);
    let none = HashMap::new();

    let mut first = vec![series("12")];
    assign_colors(&mut first, &none, &mut cache);
    let mut second = vec![series("12")];
    assign_colors(&mut second, &none, &mut cache);

    assert_eq!(first[0].color, second[0].color);
    assert_eq!(cache.get(&ColorKey::Entity(12)), first[0].color.as_deref());
    assert_eq!(cache.len(), 1);
}

#[test]
fn variables_of_one_entity_share_the_cached_color() {
    let mut cache = ColorCache::seeded(3);
    let mut list = vec![series("5-0"), series("5-1"), series("6")];
    assign_colors(&mut list, &HashMap::new(), &mut cache);

    assert_eq!(list[0].color, list[1].color);
    assert_eq!(cache.len(), 2);
    for s in &list {
        assert!(Rgb8::from_hex(s.color.as_deref().unwrap()).is_some());
    }
}

#[test]
fn malformed_ids_are_cached_by_raw_id() {
    let mut cache = ColorCache::seeded(9);
    let mut list = vec![series("abc")];
    assign_colors(&mut list, &HashMap::new(), &mut cache);

    let key = ColorKey::Unparsed("abc".into());
    assert_eq!(cache.get(&key), list[0].color.as_deref());

    cache.reset();
    assert!(cache.get(&key).is_none());
}

#[test]
fn non_hex_explicit_color_is_reused_verbatim() {
    let mut list = vec![series("4-0"), series("4-1")];
    let explicit = HashMap::from([(4, "steelblue".to_string())]);
    assign_colors(&mut list, &explicit, &mut ColorCache::seeded(0));
    assert_eq!(list[1].color.as_deref(), Some("steelblue"));
}
