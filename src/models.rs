use serde::{de::DeserializeOwned, Serialize};

pub mod auth;
pub mod cow;
pub mod calf;
pub mod pregnancy;
pub mod reproduction;
pub mod vaccine;
pub mod milk;
pub mod records;

/// Um registro persistido como documento no gateway.
///
/// O `id` nunca é gravado no corpo do documento; `CHILD_FIELDS` lista os
/// campos preenchidos a partir de sub-coleções, que também ficam de fora.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: &'static str;
    const CHILD_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

// Implementação padrão para structs com campo `id: String`
macro_rules! record {
    ($ty:ty, $collection:literal) => {
        $crate::models::record!($ty, $collection, []);
    };
    ($ty:ty, $collection:literal, [$($child:literal),*]) => {
        impl $crate::models::Record for $ty {
            const COLLECTION: &'static str = $collection;
            const CHILD_FIELDS: &'static [&'static str] = &[$($child),*];

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }
        }
    };
}
pub(crate) use record;
