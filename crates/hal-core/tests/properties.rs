//! Property tests for link merging and array collapsing.

use hal_core::prelude::*;
use hal_core::{EmbeddedResource, LinkItem, LinkItemCollection};
use proptest::prelude::*;
use serde_json::{json, Value};

fn render(resource: &Resource) -> Value {
    HalSerializer::default().to_value(resource).unwrap()
}

fn href() -> impl Strategy<Value = String> {
    "/[a-z]{1,8}(/[0-9]{1,3})?"
}

proptest! {
    #[test]
    fn same_rel_twice_merges_items_in_order(first in prop::collection::vec(href(), 1..5),
                                            second in prop::collection::vec(href(), 1..5)) {
        let mut chain = ResourceBuilder::new().add_link("x").with_link_item(first[0].clone());
        for h in &first[1..] {
            chain = chain.with_link_item(h.clone());
        }
        let mut chain = chain.add_link("x").with_link_item(second[0].clone());
        for h in &second[1..] {
            chain = chain.with_link_item(h.clone());
        }
        let resource = chain.build().unwrap();

        let links = resource.links.as_ref().unwrap();
        prop_assert_eq!(links.len(), 1);

        let expected: Vec<String> = first.iter().chain(second.iter()).cloned().collect();
        let rendered = render(&resource);
        let actual: Vec<String> = rendered["_links"]["x"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["href"].as_str().unwrap().to_string())
            .collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn link_items_collapse_unless_forced(hrefs in prop::collection::vec(href(), 1..6),
                                         forced in any::<bool>()) {
        let mut items = LinkItemCollection::new(forced);
        for h in &hrefs {
            items.add(LinkItem::new(h.clone()).unwrap());
        }
        let value = HalSerializer::default().to_value(&items).unwrap();

        if hrefs.len() == 1 && !forced {
            prop_assert_eq!(value, json!({"href": hrefs[0]}));
        } else {
            let array = value.as_array().unwrap();
            prop_assert_eq!(array.len(), hrefs.len());
        }
    }

    #[test]
    fn embedded_groups_collapse_unless_forced(count in 0usize..5, forced in any::<bool>()) {
        let mut group = EmbeddedResource::with_array_converting("items", forced).unwrap();
        for n in 0..count {
            group.add(Resource::from_value(json!({"n": n})));
        }
        let mut resource = Resource::new();
        resource.embedded_resources_mut().add(group);

        let rendered = render(&resource);
        let items = &rendered["_embedded"]["items"];
        if count == 1 && !forced {
            prop_assert_eq!(items, &json!({"n": 0}));
        } else {
            let array = items.as_array().unwrap();
            prop_assert_eq!(array.len(), count);
        }
    }

    #[test]
    fn object_state_members_sit_beside_links(keys in prop::collection::btree_set("[a-z]{1,6}", 1..6)) {
        let state: serde_json::Map<String, Value> = keys
            .iter()
            .enumerate()
            .map(|(i, k)| (k.clone(), json!(i)))
            .collect();
        let resource = ResourceBuilder::new()
            .with_state(Value::Object(state.clone()))
            .add_self_link()
            .with_link_item("/self")
            .build()
            .unwrap();

        let rendered = render(&resource);
        let object = rendered.as_object().unwrap();
        prop_assert_eq!(object.len(), state.len() + 1);
        for (k, v) in &state {
            prop_assert_eq!(object.get(k), Some(v));
        }
    }
}
