//! Fixed legacy → current lookup tables
//!
//! Keys are matched after trimming and lower-casing. Current wire names are
//! listed too, so documents that mix old and new spellings migrate cleanly.

use dialogue_model::{ComparisonOperator, MutationOperator, NodeType, TagType};

/// Legacy node kinds
pub const NODE_TYPES: &[(&str, NodeType)] = &[
    ("npc", NodeType::NpcDialog),
    ("npc_dialog", NodeType::NpcDialog),
    ("npcdialog", NodeType::NpcDialog),
    ("npc_line", NodeType::NpcDialog),
    ("character", NodeType::NpcDialog),
    ("player", NodeType::PlayerResponse),
    ("player_response", NodeType::PlayerResponse),
    ("playerresponse", NodeType::PlayerResponse),
    ("response", NodeType::PlayerResponse),
    ("choice", NodeType::PlayerResponse),
    ("option", NodeType::PlayerResponse),
    ("start", NodeType::EnterScene),
    ("entry", NodeType::EnterScene),
    ("enter", NodeType::EnterScene),
    ("enter_scene", NodeType::EnterScene),
    ("enterscene", NodeType::EnterScene),
    ("scene_start", NodeType::EnterScene),
    ("end", NodeType::ExitScene),
    ("exit", NodeType::ExitScene),
    ("exit_scene", NodeType::ExitScene),
    ("exitscene", NodeType::ExitScene),
    ("scene_end", NodeType::ExitScene),
    ("branch", NodeType::Branch),
    ("condition", NodeType::Branch),
    ("conditional", NodeType::Branch),
    ("switch", NodeType::Branch),
    ("dialog", NodeType::Dialog),
    ("dialogue", NodeType::Dialog),
    ("text", NodeType::Dialog),
];

/// Legacy comparison operators
pub const COMPARISON_OPERATORS: &[(&str, ComparisonOperator)] = &[
    ("==", ComparisonOperator::Equals),
    ("===", ComparisonOperator::Equals),
    ("eq", ComparisonOperator::Equals),
    ("is", ComparisonOperator::Equals),
    ("equals", ComparisonOperator::Equals),
    ("!=", ComparisonOperator::NotEquals),
    ("!==", ComparisonOperator::NotEquals),
    ("ne", ComparisonOperator::NotEquals),
    ("neq", ComparisonOperator::NotEquals),
    ("not_equals", ComparisonOperator::NotEquals),
    ("notequals", ComparisonOperator::NotEquals),
    (">", ComparisonOperator::GreaterThan),
    ("gt", ComparisonOperator::GreaterThan),
    ("greater_than", ComparisonOperator::GreaterThan),
    ("greaterthan", ComparisonOperator::GreaterThan),
    ("<", ComparisonOperator::LessThan),
    ("lt", ComparisonOperator::LessThan),
    ("less_than", ComparisonOperator::LessThan),
    ("lessthan", ComparisonOperator::LessThan),
    (">=", ComparisonOperator::GreaterThanOrEqual),
    ("gte", ComparisonOperator::GreaterThanOrEqual),
    ("ge", ComparisonOperator::GreaterThanOrEqual),
    ("greaterthanorequal", ComparisonOperator::GreaterThanOrEqual),
    ("<=", ComparisonOperator::LessThanOrEqual),
    ("lte", ComparisonOperator::LessThanOrEqual),
    ("le", ComparisonOperator::LessThanOrEqual),
    ("lessthanorequal", ComparisonOperator::LessThanOrEqual),
    ("contains", ComparisonOperator::Contains),
    ("includes", ComparisonOperator::Contains),
    ("has", ComparisonOperator::Contains),
    ("in", ComparisonOperator::Contains),
];

/// Legacy mutation operators
pub const MUTATION_OPERATORS: &[(&str, MutationOperator)] = &[
    ("=", MutationOperator::Set),
    ("set", MutationOperator::Set),
    ("assign", MutationOperator::Set),
    ("+=", MutationOperator::Add),
    ("add", MutationOperator::Add),
    ("inc", MutationOperator::Add),
    ("increment", MutationOperator::Add),
    ("-=", MutationOperator::Subtract),
    ("sub", MutationOperator::Subtract),
    ("subtract", MutationOperator::Subtract),
    ("dec", MutationOperator::Subtract),
    ("decrement", MutationOperator::Subtract),
    ("*=", MutationOperator::Multiply),
    ("mul", MutationOperator::Multiply),
    ("multiply", MutationOperator::Multiply),
    ("toggle", MutationOperator::Toggle),
    ("flip", MutationOperator::Toggle),
    ("append", MutationOperator::Append),
    ("push", MutationOperator::Append),
];

/// Legacy tag kinds
pub const TAG_TYPES: &[(&str, TagType)] = &[
    ("personality", TagType::Personality),
    ("trait", TagType::Personality),
    ("character", TagType::Personality),
    ("emotion", TagType::Emotion),
    ("mood", TagType::Emotion),
    ("feeling", TagType::Emotion),
    ("relationship", TagType::Relationship),
    ("relation", TagType::Relationship),
    ("bond", TagType::Relationship),
    ("location", TagType::Location),
    ("place", TagType::Location),
    ("setting", TagType::Location),
    ("context", TagType::Context),
    ("scene", TagType::Context),
    ("background", TagType::Context),
    ("custom", TagType::Custom),
];

fn lookup<T: Copy>(table: &[(&str, T)], key: &str) -> Option<T> {
    let key = key.trim().to_ascii_lowercase();
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Translate a legacy node kind; unknown kinds fall back to [`NodeType::Dialog`]
#[must_use]
pub fn node_type(legacy: Option<&str>) -> NodeType {
    legacy
        .and_then(|k| lookup(NODE_TYPES, k))
        .unwrap_or(NodeType::Dialog)
}

/// Translate a legacy comparison; unknown comparisons become equality
#[must_use]
pub fn comparison(legacy: Option<&str>) -> ComparisonOperator {
    legacy
        .and_then(|k| lookup(COMPARISON_OPERATORS, k))
        .unwrap_or(ComparisonOperator::Equals)
}

/// Translate a legacy mutation; unknown mutations become assignment
#[must_use]
pub fn mutation(legacy: Option<&str>) -> MutationOperator {
    legacy
        .and_then(|k| lookup(MUTATION_OPERATORS, k))
        .unwrap_or(MutationOperator::Set)
}

/// Translate a legacy tag kind; unknown kinds become [`TagType::Custom`]
#[must_use]
pub fn tag_type(legacy: Option<&str>) -> TagType {
    legacy
        .and_then(|k| lookup(TAG_TYPES, k))
        .unwrap_or(TagType::Custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_types_map_case_insensitively() {
        assert_eq!(node_type(Some("NPC")), NodeType::NpcDialog);
        assert_eq!(node_type(Some(" player ")), NodeType::PlayerResponse);
        assert_eq!(node_type(Some("npcDialog")), NodeType::NpcDialog);
    }

    #[test]
    fn unknown_values_fall_back() {
        assert_eq!(node_type(Some("cutscene")), NodeType::Dialog);
        assert_eq!(node_type(None), NodeType::Dialog);
        assert_eq!(comparison(Some("~=")), ComparisonOperator::Equals);
        assert_eq!(mutation(Some("xor")), MutationOperator::Set);
        assert_eq!(tag_type(Some("weather")), TagType::Custom);
    }

    #[test]
    fn operator_symbols() {
        assert_eq!(comparison(Some(">=")), ComparisonOperator::GreaterThanOrEqual);
        assert_eq!(comparison(Some("!=")), ComparisonOperator::NotEquals);
        assert_eq!(mutation(Some("+=")), MutationOperator::Add);
        assert_eq!(mutation(Some("push")), MutationOperator::Append);
    }

    #[test]
    fn every_current_wire_name_is_reachable() {
        for t in NodeType::ALL {
            assert_eq!(node_type(Some(t.as_str())), t);
        }
    }

    #[test]
    fn table_keys_are_normalized() {
        for (k, _) in NODE_TYPES {
            assert_eq!(*k, k.to_ascii_lowercase());
        }
        for (k, _) in TAG_TYPES {
            assert_eq!(*k, k.to_ascii_lowercase());
        }
    }
}
