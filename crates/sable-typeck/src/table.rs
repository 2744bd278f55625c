//! Append-only type arena

use sable_ast::TypeId;
use serde::Serialize;

use crate::types::Type;

/// Every type the checker computed, addressed by [`TypeId`].
///
/// Ids are dense insertion indices; an issued `(id, type)` pair never changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TypeTable {
    types: Vec<Type>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, ty: Type) -> TypeId {
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty);
        id
    }

    /// Panics on an id this table never issued.
    pub fn get(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &Type)> {
        self.types
            .iter()
            .enumerate()
            .map(|(i, ty)| (TypeId(i as u32), ty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_dense_and_stable() {
        let mut table = TypeTable::new();
        let a = table.add(Type::Number);
        let b = table.add(Type::Number);
        let c = table.add(Type::array(Type::String));

        assert_eq!((a, b, c), (TypeId(0), TypeId(1), TypeId(2)));
        assert_eq!(table.get(a), &Type::Number);
        assert_eq!(table.get(c), &Type::array(Type::String));
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.iter().map(|(id, _)| id).collect::<Vec<_>>(),
            vec![a, b, c]
        );
    }

    #[test]
    #[should_panic]
    fn test_get_unissued_id_panics() {
        let table = TypeTable::new();
        table.get(TypeId(0));
    }
}
