// -----------------------------------------------------------------------------
// Modules

mod match_reflect;

mod trait_from_reflect;
mod trait_introspect;
mod trait_object;
mod trait_reflect;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use match_reflect::match_reflect_impls;

use trait_from_reflect::impl_trait_from_reflect;
use trait_introspect::impl_trait_introspect;
use trait_object::impl_trait_object;
use trait_reflect::impl_trait_reflect;
use trait_typed::impl_trait_typed;
