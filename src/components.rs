//! Allocation-free lookup of components attached to an object

use std::any::{Any, TypeId};

pub type Component = Box<dyn Any + Send + Sync>;

/// Find components by type without collecting them first
///
/// # Examples
///
/// ```
/// use unity_tools::{Component, ComponentLookup};
///
/// struct Health(u32);
/// struct Name(&'static str);
///
/// let components: Vec<Component> = vec![
///     Box::new(Name("player")),
///     Box::new(Health(100)),
///     Box::new(Health(5)),
/// ];
///
/// assert_eq!(components.first_component::<Health>().unwrap().0, 100);
/// assert!(components.first_component::<u8>().is_none());
/// ```
pub trait ComponentLookup {
    /// First component of type `C`
    fn first_component<C: Any>(&self) -> Option<&C>;

    fn first_component_mut<C: Any>(&mut self) -> Option<&mut C>;

    /// First component whose concrete type is `type_id`
    fn component_of_type(&self, type_id: TypeId) -> Option<&(dyn Any + Send + Sync)>;
}

impl ComponentLookup for [Component] {
    fn first_component<C: Any>(&self) -> Option<&C> {
        self.iter().find_map(|component| component.downcast_ref::<C>())
    }

    fn first_component_mut<C: Any>(&mut self) -> Option<&mut C> {
        self.iter_mut()
            .find_map(|component| component.downcast_mut::<C>())
    }

    fn component_of_type(&self, type_id: TypeId) -> Option<&(dyn Any + Send + Sync)> {
        self.iter()
            .map(|component| &**component)
            .find(|component| (**component).type_id() == type_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Transform {
        x: f32,
    }

    #[test]
    fn test_first_component_mut() {
        let mut components: Vec<Component> = vec![Box::new(Transform { x: 1.0 })];
        components.first_component_mut::<Transform>().unwrap().x = 4.0;
        assert_eq!(components.first_component::<Transform>().unwrap().x, 4.0);
    }

    #[test]
    fn test_lookup_on_any_contiguous_storage() {
        let array: [Component; 2] = [Box::new(2u16), Box::new(Transform { x: 3.0 })];
        assert_eq!(array.first_component::<u16>(), Some(&2));

        let mut boxed: Box<[Component]> = vec![Box::new(Transform { x: 1.0 }) as Component].into_boxed_slice();
        boxed.first_component_mut::<Transform>().unwrap().x = 2.0;
        assert_eq!(boxed.first_component::<Transform>().unwrap().x, 2.0);

        let borrowed: &[Component] = &array[1..];
        assert!(borrowed.first_component::<u16>().is_none());
    }

    #[test]
    fn test_component_of_type() {
        let components: Vec<Component> = vec![Box::new(1u8), Box::new(Transform { x: 0.0 })];

        let found = components.component_of_type(TypeId::of::<Transform>()).unwrap();
        assert!(found.is::<Transform>());
        assert!(components.component_of_type(TypeId::of::<u64>()).is_none());
    }
}
