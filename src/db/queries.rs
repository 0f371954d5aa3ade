use super::cache::ReferenceCache;
use super::client::DirectusClient;
use super::pager::{fetch_paged, ErrorSink};
use crate::models::{
    Brand, Collection, DirectusRecord, DivisionRecord, Invoice, InvoiceLineItem, Product,
    ProductSupplierLink, ReturnLineItem, SalesReturn, SalesSnapshot, Salesman, Section, Supplier,
};
use serde_json::Value;

/// 单个集合的解析结果
#[derive(Debug)]
pub struct Fetched<T> {
    pub rows: Vec<T>,
    /// 无法解析而跳过的行
    pub skipped: usize,
    pub from_cache: bool,
}

fn decode<T: DirectusRecord>(raw: impl IntoIterator<Item = Value>, from_cache: bool) -> Fetched<T> {
    let mut rows = Vec::new();
    let mut skipped = 0;
    for value in raw {
        match serde_json::from_value::<T>(value) {
            Ok(row) => rows.push(row),
            Err(e) => {
                skipped += 1;
                tracing::debug!("{}: skipping malformed row: {}", T::COLLECTION, e);
            }
        }
    }
    Fetched {
        rows,
        skipped,
        from_cache,
    }
}

/// 拉取并解析一个集合; 传入 cache 时先查缓存，完整拉取成功后回填
pub async fn fetch_collection<T: DirectusRecord>(
    client: &DirectusClient,
    cache: Option<&ReferenceCache>,
    sink: &ErrorSink,
) -> Fetched<T> {
    if let Some(rows) = cache.and_then(|c| c.get(T::COLLECTION)) {
        tracing::debug!("{}: served {} rows from cache", T::COLLECTION, rows.len());
        return decode(rows.iter().cloned(), true);
    }

    let paged = fetch_paged(client, T::COLLECTION, T::FIELDS, sink).await;
    if paged.complete {
        if let Some(cache) = cache {
            cache.insert(T::COLLECTION, paged.rows.clone());
        }
    }
    decode(paged.rows, false)
}

/// 并发拉取报表所需的全部集合
///
/// 单个集合失败只记录错误，其余集合照常返回。
pub async fn load_snapshot(client: &DirectusClient, cache: &ReferenceCache) -> SalesSnapshot {
    let sink = ErrorSink::default();
    let reference = if cache.is_enabled() { Some(cache) } else { None };

    let (
        (invoices, line_items, returns, return_items, collections),
        (products, product_suppliers, suppliers, salesmen, divisions, brands, sections),
    ) = futures::join!(
        async {
            futures::join!(
                fetch_collection::<Invoice>(client, None, &sink),
                fetch_collection::<InvoiceLineItem>(client, None, &sink),
                fetch_collection::<SalesReturn>(client, None, &sink),
                fetch_collection::<ReturnLineItem>(client, None, &sink),
                fetch_collection::<Collection>(client, None, &sink),
            )
        },
        async {
            futures::join!(
                fetch_collection::<Product>(client, reference, &sink),
                fetch_collection::<ProductSupplierLink>(client, reference, &sink),
                fetch_collection::<Supplier>(client, reference, &sink),
                fetch_collection::<Salesman>(client, reference, &sink),
                fetch_collection::<DivisionRecord>(client, reference, &sink),
                fetch_collection::<Brand>(client, reference, &sink),
                fetch_collection::<Section>(client, reference, &sink),
            )
        },
    );

    let mut snapshot = SalesSnapshot::default();
    snapshot.invoices = take(&mut snapshot, invoices);
    snapshot.line_items = take(&mut snapshot, line_items);
    snapshot.returns = take(&mut snapshot, returns);
    snapshot.return_items = take(&mut snapshot, return_items);
    snapshot.collections = take(&mut snapshot, collections);
    snapshot.products = take(&mut snapshot, products);
    snapshot.product_suppliers = take(&mut snapshot, product_suppliers);
    snapshot.suppliers = take(&mut snapshot, suppliers);
    snapshot.salesmen = take(&mut snapshot, salesmen);
    snapshot.divisions = take(&mut snapshot, divisions);
    snapshot.brands = take(&mut snapshot, brands);
    snapshot.sections = take(&mut snapshot, sections);
    snapshot.errors = sink.into_vec();

    tracing::info!(
        "Loaded {} rows from {} collections ({} errors, {} skipped rows, {} cached)",
        snapshot.total_rows(),
        snapshot.counts.len(),
        snapshot.errors.len(),
        snapshot.skipped_rows,
        snapshot.cached_collections.len()
    );
    snapshot
}

/// 记录行数 / 跳过数 / 缓存命中，返回行
fn take<T: DirectusRecord>(snapshot: &mut SalesSnapshot, fetched: Fetched<T>) -> Vec<T> {
    snapshot
        .counts
        .insert(T::COLLECTION.to_string(), fetched.rows.len());
    snapshot.skipped_rows += fetched.skipped;
    if fetched.from_cache {
        snapshot.cached_collections.push(T::COLLECTION.to_string());
    }
    fetched.rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn malformed_rows_are_skipped_not_fatal() {
        let fetched: Fetched<Invoice> = decode(
            vec![
                json!({"invoice_id": 1, "invoice_date": "2024-03-10"}),
                json!("not an object"),
                json!({"invoice_id": "2", "invoice_date": null}),
            ],
            false,
        );
        assert_eq!(fetched.rows.len(), 2);
        assert_eq!(fetched.skipped, 1);
        assert_eq!(fetched.rows[1].invoice_id.as_deref(), Some("2"));
        assert!(fetched.rows[1].invoice_date.is_none());
    }
}
