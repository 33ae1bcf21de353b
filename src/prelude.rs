//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    analytics::{
        AnalyticsError, MonthlyRevenue, Order, OrderStatus, count_by_status, load_orders,
        revenue_by_month,
    },
    cart::{Cart, CartItem},
    catalog::{Catalog, CatalogError, CatalogProduct},
    checkout::{
        CheckoutError, CheckoutRates, OrderLine, OrderRequest, OrderTotals, calculate_total,
        order_totals,
    },
    context::{DEFAULT_NAMESPACE, StoreContext},
    products::ProductId,
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
    wishlist::{Wishlist, WishlistItem},
};
