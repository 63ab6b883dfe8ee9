//! Bindings for C
//!
//! Fields cross the language boundary as opaque `u64` tokens issued by a process-wide
//! [`FieldRegistry`]. Releasing a token drops its field; any later use of the token,
//! including a second release, is reported as an error instead of touching freed memory.

#![allow(missing_docs)]
#![allow(clippy::missing_safety_doc)]

use crate::data::{Count, Scalar, Shear};
use crate::error::{Error, Result};
use crate::field::{
    GFieldFlat, GFieldSphere, KFieldFlat, KFieldSphere, NFieldFlat, NFieldSphere,
};
use crate::geometry::{Flat, Sphere};
use crate::options::FieldOptions;
use crate::types::SplitMethod;
use libc::{c_int, c_long};
use log::error;
use paste::paste;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// A field of any data category and geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FieldType {
    NFlat = 0,
    NSphere = 1,
    KFlat = 2,
    KSphere = 3,
    GFlat = 4,
    GSphere = 5,
}

/// An owned field of any data category and geometry
pub enum AnyField {
    NFlat(NFieldFlat),
    NSphere(NFieldSphere),
    KFlat(KFieldFlat),
    KSphere(KFieldSphere),
    GFlat(GFieldFlat),
    GSphere(GFieldSphere),
}

macro_rules! dispatch {
    ($value:expr, $field:ident => $body:expr) => {
        match $value {
            AnyField::NFlat($field) => $body,
            AnyField::NSphere($field) => $body,
            AnyField::KFlat($field) => $body,
            AnyField::KSphere($field) => $body,
            AnyField::GFlat($field) => $body,
            AnyField::GSphere($field) => $body,
        }
    };
}

impl AnyField {
    /// Data category and geometry of the field
    pub fn field_type(&self) -> FieldType {
        match self {
            AnyField::NFlat(_) => FieldType::NFlat,
            AnyField::NSphere(_) => FieldType::NSphere,
            AnyField::KFlat(_) => FieldType::KFlat,
            AnyField::KSphere(_) => FieldType::KSphere,
            AnyField::GFlat(_) => FieldType::GFlat,
            AnyField::GSphere(_) => FieldType::GSphere,
        }
    }

    /// Number of top-level cells
    pub fn cell_count(&self) -> usize {
        dispatch!(self, f => f.cell_count())
    }

    /// Number of points
    pub fn nobj(&self) -> usize {
        dispatch!(self, f => f.nobj())
    }

    /// Number of cells across every tree
    pub fn total_cells(&self) -> usize {
        dispatch!(self, f => f.total_cells())
    }
}

/// Maps tokens to owned fields
#[derive(Default)]
pub struct FieldRegistry {
    next: u64,
    fields: HashMap<u64, AnyField>,
}

impl FieldRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a field and issue a token for it
    ///
    /// Tokens are never zero and never reused.
    pub fn insert(&mut self, field: impl Into<AnyField>) -> u64 {
        self.next += 1;
        self.fields.insert(self.next, field.into());
        self.next
    }

    /// Borrow the field behind a token
    pub fn get(&self, token: u64) -> Result<&AnyField> {
        self.fields.get(&token).ok_or(Error::InvalidHandle(token))
    }

    /// Remove the field behind a token, returning it to the caller
    pub fn release(&mut self, token: u64) -> Result<AnyField> {
        self.fields.remove(&token).ok_or(Error::InvalidHandle(token))
    }

    /// Release a token only if it refers to a field of the given type
    pub fn release_typed(&mut self, token: u64, field_type: FieldType) -> Result<AnyField> {
        if self.get(token)?.field_type() != field_type {
            return Err(Error::InvalidHandle(token));
        }
        self.release(token)
    }

    /// Number of live fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if there are no live fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

lazy_static! {
    static ref REGISTRY: Mutex<FieldRegistry> = Mutex::new(FieldRegistry::new());
}

/// Lock the process-wide registry
pub fn registry() -> MutexGuard<'static, FieldRegistry> {
    // A panic while holding the lock cannot leave the map half-updated
    REGISTRY.lock().unwrap_or_else(|e| e.into_inner())
}

unsafe fn input_slice<'a>(name: &str, ptr: *const f64, nobj: usize) -> Result<&'a [f64]> {
    if ptr.is_null() {
        return Err(Error::InvalidInput(format!("Null pointer for {name}")));
    }
    Ok(std::slice::from_raw_parts(ptr, nobj))
}

fn input_options(
    nobj: c_long,
    minsep: f64,
    maxsep: f64,
    bin_size: f64,
    sm: c_int,
) -> Result<(usize, FieldOptions)> {
    let nobj = usize::try_from(nobj)
        .map_err(|_| Error::InvalidInput(format!("Negative number of objects: {nobj}")))?;
    let mut options = FieldOptions::new(minsep, maxsep, bin_size);
    options.set_split_method(SplitMethod::try_from(sm)?);
    Ok((nobj, options))
}

fn issue(result: Result<AnyField>) -> u64 {
    match result {
        Ok(field) => registry().insert(field),
        Err(e) => {
            error!("{e}");
            0
        }
    }
}

macro_rules! field_bindings {
    ($cat:ident, $geom:ident, $variant:ident, $data:ty, $geometry:ty, [$($arr:ident),*]) => {
        impl From<crate::field::Field<$data, $geometry>> for AnyField {
            fn from(field: crate::field::Field<$data, $geometry>) -> Self {
                AnyField::$variant(field)
            }
        }

        paste! {
            /// Build a field and return its token, or 0 if construction fails
            ///
            /// # Safety
            /// Every non-null pointer must refer to at least `nobj` readable values.
            #[no_mangle]
            pub unsafe extern "C" fn [<build_ $cat _field_ $geom>](
                a: *const f64,
                b: *const f64,
                $($arr: *const f64,)*
                w: *const f64,
                nobj: c_long,
                minsep: f64,
                maxsep: f64,
                bin_size: f64,
                sm: c_int,
            ) -> u64 {
                let build = || -> Result<AnyField> {
                    let (nobj, options) = input_options(nobj, minsep, maxsep, bin_size, sm)?;
                    let a = input_slice("a", a, nobj)?;
                    let b = input_slice("b", b, nobj)?;
                    $(let $arr = input_slice(stringify!($arr), $arr, nobj)?;)*
                    let w = input_slice("w", w, nobj)?;
                    let field = crate::field::Field::<$data, $geometry>::new(
                        a, b, $($arr,)* w, &options,
                    )?;
                    Ok(field.into())
                };
                issue(build())
            }

            /// Release a field, returning 0 on success and -1 for an unknown token or a
            /// token of another field type
            #[no_mangle]
            pub extern "C" fn [<destroy_ $cat _field_ $geom>](token: u64) -> c_int {
                match registry().release_typed(token, FieldType::$variant) {
                    Ok(_) => 0,
                    Err(e) => {
                        error!("{e}");
                        -1
                    }
                }
            }
        }
    };
}

field_bindings!(n, flat, NFlat, Count, Flat, []);
field_bindings!(n, sphere, NSphere, Count, Sphere, []);
field_bindings!(k, flat, KFlat, Scalar, Flat, [k]);
field_bindings!(k, sphere, KSphere, Scalar, Sphere, [k]);
field_bindings!(g, flat, GFlat, Shear, Flat, [g1, g2]);
field_bindings!(g, sphere, GSphere, Shear, Sphere, [g1, g2]);

/// Number of top-level cells of a field, or -1 for an unknown token
#[no_mangle]
pub extern "C" fn field_cell_count(token: u64) -> c_long {
    registry()
        .get(token)
        .map_or(-1, |f| f.cell_count() as c_long)
}

/// Number of points in a field, or -1 for an unknown token
#[no_mangle]
pub extern "C" fn field_nobj(token: u64) -> c_long {
    registry().get(token).map_or(-1, |f| f.nobj() as c_long)
}
