//! Effective field-set computation for catalog edit forms.
//!
//! The web layer asks which fields the acting user may edit before applying
//! an update; the answer is a pure function of the editing context, never a
//! mutation of a shared form object.

use std::collections::HashSet;

use comercio_shared::types::UserId;

/// Context of one editing request.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext {
    /// The user performing the edit; becomes the owner on new records.
    pub acting_user: UserId,
    /// Whether the acting user holds elevated catalog privileges.
    pub is_privileged: bool,
    /// Whether the record is being created (true) or edited (false).
    pub is_new_record: bool,
}

/// Editable fields of a product record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    /// Product description.
    Description,
    /// Purchase cost. Privileged users only.
    Cost,
    /// Sale price.
    Price,
    /// Tax rate percent.
    TaxRate,
    /// Brand reference.
    Brand,
    /// Supplier reference.
    Supplier,
    /// Category links.
    Categories,
    /// Active flag. Privileged users, existing records only.
    Active,
}

/// Returns the set of product fields the context may edit.
///
/// Stock is deliberately absent: only the document engines mutate stock.
#[must_use]
pub fn editable_product_fields(ctx: &FieldContext) -> HashSet<ProductField> {
    let mut fields = HashSet::from([
        ProductField::Description,
        ProductField::Price,
        ProductField::TaxRate,
        ProductField::Brand,
        ProductField::Supplier,
        ProductField::Categories,
    ]);
    if ctx.is_privileged {
        fields.insert(ProductField::Cost);
        if !ctx.is_new_record {
            fields.insert(ProductField::Active);
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ctx(is_privileged: bool, is_new_record: bool) -> FieldContext {
        FieldContext {
            acting_user: UserId::new(),
            is_privileged,
            is_new_record,
        }
    }

    #[test]
    fn test_base_fields_always_editable() {
        let fields = editable_product_fields(&ctx(false, true));
        assert!(fields.contains(&ProductField::Description));
        assert!(fields.contains(&ProductField::Price));
        assert!(fields.contains(&ProductField::Categories));
    }

    #[rstest]
    #[case(false, true, false)]
    #[case(false, false, false)]
    #[case(true, true, true)]
    #[case(true, false, true)]
    fn test_cost_requires_privilege(
        #[case] privileged: bool,
        #[case] new_record: bool,
        #[case] expected: bool,
    ) {
        let fields = editable_product_fields(&ctx(privileged, new_record));
        assert_eq!(fields.contains(&ProductField::Cost), expected);
    }

    #[rstest]
    #[case(false, true, false)]
    #[case(false, false, false)]
    #[case(true, true, false)]
    #[case(true, false, true)]
    fn test_active_flag_privileged_existing_only(
        #[case] privileged: bool,
        #[case] new_record: bool,
        #[case] expected: bool,
    ) {
        let fields = editable_product_fields(&ctx(privileged, new_record));
        assert_eq!(fields.contains(&ProductField::Active), expected);
    }

    #[test]
    fn test_stock_never_listed() {
        // ProductField has no Stock variant; the assertion here is that the
        // full privileged set is exactly the eight fields minus stock.
        let fields = editable_product_fields(&ctx(true, false));
        assert_eq!(fields.len(), 8);
    }
}
