use crate::application::app_error::AppError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::str::FromStr;
use uuid::Uuid;

/// Typed identifier. The phantom parameter keeps a user id from being passed
/// where a challenge id is expected.
pub struct Id<T> {
    pub value: Uuid,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: Uuid) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub fn generate() -> Id<T> {
        Id::new(Uuid::now_v7())
    }
}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Id<T> {}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T> Eq for Id<T> {}

impl<T> Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value.fmt(f)
    }
}

impl<T> TryFrom<&str> for Id<T> {
    type Error = AppError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let uuid = Uuid::from_str(value.trim())
            .map_err(|e| AppError::InvalidId(format!("Invalid UUID: {}", e)))?;
        Ok(Id::new(uuid))
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Id::try_from(value.as_str())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use crate::application::app_error::AppError;
    use crate::domain::entities::id::Id;
    use uuid::Uuid;

    struct TestEntity;

    #[test]
    fn test_id_generate_is_unique() {
        let id1: Id<TestEntity> = Id::generate();
        let id2: Id<TestEntity> = Id::generate();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_id_try_from_valid_uuid() {
        let uuid = Uuid::now_v7();
        let id: Id<TestEntity> = uuid.to_string().try_into().unwrap();
        assert_eq!(id.value, uuid);
    }

    #[test]
    fn test_id_try_from_trims_whitespace() {
        let uuid = Uuid::now_v7();
        let id: Id<TestEntity> = Id::try_from(format!(" {} ", uuid).as_str()).unwrap();
        assert_eq!(id.value, uuid);
    }

    #[test]
    fn test_id_try_from_invalid_uuid() {
        let result: Result<Id<TestEntity>, _> = "invalid".to_owned().try_into();
        assert!(matches!(result, Err(AppError::InvalidId(_))));
    }

    #[test]
    fn test_id_is_copy_and_hashable() {
        let id: Id<TestEntity> = Id::generate();
        let copied = id;
        let set: HashSet<Id<TestEntity>> = [id, copied].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert_eq!(id.to_string(), copied.value.to_string());
    }
}
