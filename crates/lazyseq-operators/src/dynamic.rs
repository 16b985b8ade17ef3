//! Runtime-typed views over `Seq<Value>`: `cast` and `of_type`.

use lazyseq_core::value::{FromValue, Value};
use lazyseq_core::SeqError;

use crate::seq::Seq;
use crate::traits::{cursor, Element};

impl Seq<Value> {
    /// View every element as `U`; the first element that cannot be viewed
    /// fails with `InvalidCast` at the pull that reaches it.
    pub fn cast<U>(&self) -> Seq<U>
    where
        U: FromValue + Element,
    {
        let source = self.clone();
        Seq::deferred("cast", move || {
            let mut it = source.iter();
            cursor(move || match it.pull()? {
                Some(value) => match U::from_value(&value) {
                    Some(viewed) => Ok(Some(viewed)),
                    None => Err(SeqError::InvalidCast {
                        from: value.type_name(),
                        to: U::TYPE_NAME,
                    }),
                },
                None => Ok(None),
            })
        })
    }

    /// Keep only elements viewable as `U`. `Null` is always skipped, even
    /// when `U` could represent it.
    pub fn of_type<U>(&self) -> Seq<U>
    where
        U: FromValue + Element,
    {
        let source = self.clone();
        Seq::deferred("of_type", move || {
            let mut it = source.iter();
            cursor(move || {
                while let Some(value) = it.pull()? {
                    if value.is_null() {
                        continue;
                    }
                    if let Some(viewed) = U::from_value(&value) {
                        return Ok(Some(viewed));
                    }
                }
                Ok(None)
            })
        })
    }
}
