#![allow(dead_code)]

use tracing_subscriber::EnvFilter;

/// Two-tool store manifest in the heading grammar.
pub const STORE_HEADING: &str = "# Lamp Store
Online lighting shop.

## Important
Rate limit: 10 requests per minute.
Do not retry failed checkouts.

## searchProducts
Search the catalog.

### Params
- `query` (string, required): Search text.
- `limit` (number, optional, default=20): Max results.

### Output
```typescript
{ products: Array<{ id: string; name: string; price: number }>; total: number }
```

### Sample Code
```js
const r = await global.searchProducts(\"lamp\", 5);
```

## addToCart
Add a product to the cart.

### Params
- `productId` (string, required): Product identifier.
- `quantity` (number, optional, default=1): How many to add.

### Output
```typescript
{ cartId: string; items: number }
```
";

/// The same manifest in the compact grammar.
pub const STORE_COMPACT: &str = "# Lamp Store
Online lighting shop.

## Important
Rate limit: 10 requests per minute.
Do not retry failed checkouts.

tool: searchProducts(query, limit=20)
  description: Search the catalog.
  params:
    query: string // Search text.
    limit: number // Max results.
  output: { products: Array<{ id: string; name: string; price: number }>; total: number }
  sample_code:
    ```js
    const r = await global.searchProducts(\"lamp\", 5);
    ```

tool: addToCart(productId, quantity=1)
  description: Add a product to the cart.
  params:
    productId: string // Product identifier.
    quantity: number // How many to add.
  returns: |
    { cartId: string; items: number }
";

/// Routes crate logs to the test harness when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
