//! List types (IDREFS, ENTITIES, NMTOKENS)

use crate::error::{Error, Result};
use crate::types::builtins::split_list;
use crate::types::value::*;

/// A list type and the type of its items
pub trait ListKind: XsdType {
    /// Item type
    type Item: XsdType;
}

impl ListKind for IdRefsType {
    type Item = IdRefType;
}

impl ListKind for EntitiesType {
    type Item = EntityType;
}

impl ListKind for NmTokensType {
    type Item = NmTokenType;
}

impl<T: ListKind> Value<T> {
    /// Split into items, re-validating each through the item type
    pub fn to_array(&self) -> Result<Vec<Value<T::Item>>> {
        split_list(&self.value())
            .into_iter()
            .map(Value::<T::Item>::from_string)
            .collect()
    }

    /// Join items with single spaces
    pub fn from_array(items: &[Value<T::Item>]) -> Result<Self> {
        if items.is_empty() {
            return Err(Error::violation(format!(
                "xs:{} must contain at least one item",
                T::descriptor().name
            )));
        }
        let joined = items
            .iter()
            .map(|item| item.value())
            .collect::<Vec<_>>()
            .join(" ");
        Self::from_string(joined)
    }

    /// Number of items
    pub fn len(&self) -> usize {
        split_list(&self.value()).len()
    }

    /// Lists are never empty once built
    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::MAX_LIST_TOKENS;

    #[test]
    fn test_to_array() {
        let refs = IdRefsValue::from_string("\n a  b\tc ").unwrap();
        let items: Vec<String> = refs.to_array().unwrap().iter().map(|v| v.value()).collect();
        assert_eq!(items, vec!["a", "b", "c"]);
        assert_eq!(refs.len(), 3);
        assert_eq!(refs.value(), "a b c");
    }

    #[test]
    fn test_from_array() {
        let items = vec![
            NmTokenValue::from_string("1a").unwrap(),
            NmTokenValue::from_string(" b ").unwrap(),
        ];
        let tokens = NmTokensValue::from_array(&items).unwrap();
        assert_eq!(tokens.value(), "1a b");
        assert_eq!(tokens.to_array().unwrap(), items);
    }

    #[test]
    fn test_empty_list_rejected() {
        assert!(EntitiesValue::from_string("   ").is_err());
        assert!(EntitiesValue::from_array(&[]).unwrap_err().is_schema_violation());
    }

    #[test]
    fn test_invalid_item_rejected() {
        let err = IdRefsValue::from_string("a b:c").unwrap_err();
        assert!(err.to_string().contains("b:c"));
    }

    #[test]
    fn test_bounded_split() {
        let ok = vec!["t"; MAX_LIST_TOKENS].join(" ");
        assert_eq!(NmTokensValue::from_string(ok).unwrap().len(), MAX_LIST_TOKENS);

        let over = vec!["t"; MAX_LIST_TOKENS + 1].join(" ");
        assert!(NmTokensValue::from_string(over).is_err());
    }

    #[test]
    fn test_long_lists_are_accepted() {
        let refs = vec!["r"; 1500].join(" ");
        let value = IdRefsValue::from_string(refs).unwrap();
        assert_eq!(value.to_array().unwrap().len(), 1500);
    }
}
