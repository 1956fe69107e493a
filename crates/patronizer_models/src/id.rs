use sqlx::{
	error::BoxDynError,
	postgres::{ PgTypeInfo, PgValueRef },
	Decode, Postgres, Type
};
use std::{
	cmp::Ordering,
	fmt::{ Debug, Display },
	hash::{ Hash, Hasher },
	marker::PhantomData
};
use serde::{ Serialize, Serializer, Deserialize, Deserializer };
use uuid::Uuid;

pub mod marker {
	pub struct PageMarker;
	pub struct CampaignMarker;
	pub struct TierMarker;
	pub struct PatronMarker;
	pub struct NotificationMarker;
	pub struct UserMarker;
}

pub struct PatronizerId<T> {
	pub value: Uuid,
	phantom: PhantomData<fn(T) -> T>
}

impl<T> PatronizerId<T> {
	pub const fn new(value: Uuid) -> Self {
		Self {
			value,
			phantom: PhantomData
		}
	}

	pub fn random() -> Self {
		Self::new(Uuid::new_v4())
	}
}

impl<T> Clone for PatronizerId<T> {
	fn clone(&self) -> Self {
		*self
	}
}

impl<T> Copy for PatronizerId<T> {}

impl<T> Debug for PatronizerId<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		Debug::fmt(&self.value, f)
	}
}

impl<T> Eq for PatronizerId<T> {}

impl<T> Hash for PatronizerId<T> {
	fn hash<U: Hasher>(&self, state: &mut U) {
		self.value.hash(state)
	}
}

impl<T> Ord for PatronizerId<T> {
	fn cmp(&self, other: &Self) -> Ordering {
		self.value.cmp(&other.value)
	}
}

impl<T> PartialOrd for PatronizerId<T> {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl<T> PartialEq for PatronizerId<T> {
	fn eq(&self, other: &Self) -> bool {
		self.value == other.value
	}
}

impl<T> Display for PatronizerId<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		Display::fmt(&self.value, f)
	}
}

impl<T> From<Uuid> for PatronizerId<T> {
	fn from(value: Uuid) -> Self {
		Self::new(value)
	}
}

impl<T> Serialize for PatronizerId<T> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		self.value.serialize(serializer)
	}
}

impl<'de, T> Deserialize<'de> for PatronizerId<T> {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		Ok(Self::new(Uuid::deserialize(deserializer)?))
	}
}

impl<T> Type<Postgres> for PatronizerId<T> {
	fn type_info() -> PgTypeInfo {
		<Uuid as Type<Postgres>>::type_info()
	}
}

impl<'r, T> Decode<'r, Postgres> for PatronizerId<T> {
	fn decode(value: PgValueRef<'r>) -> Result<Self, BoxDynError> {
		Ok(Self::new(<Uuid as Decode<'r, Postgres>>::decode(value)?))
	}
}
