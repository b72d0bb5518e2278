//! The fixed OFX investment-statement schema: where the transaction list
//! lives, how column headers are inferred and how entries become rows.

use std::collections::HashMap;

use crate::errors::ConvertResult;
use crate::tree::Node;

/// Chain of tags walked from the document root down to the transaction
/// list container. Kept as data so the expected-schema contract is
/// testable on its own.
pub const TRANSACTION_LIST_PATH: [&str; 4] = [
    "INVSTMTMSGSRSV1",
    "INVSTMTTRNRS",
    "INVSTMTRS",
    "INVTRANLIST",
];

/// Tag of one bank-type investment transaction entry.
pub const TRANSACTION_TAG: &str = "INVBANKTRAN";

/// Nested element holding the core transaction fields.
pub const DETAIL_TAG: &str = "STMTTRN";

/// Sibling field hoisted as the synthetic leading column.
pub const FUND_COLUMN: &str = "SUBACCTFUND";

/// Walks the fixed path from the document root to the `INVTRANLIST` node.
/// Any missing link fails with the parent and sought tag named.
pub fn transaction_list(root: &Node) -> ConvertResult<&Node> {
    TRANSACTION_LIST_PATH
        .iter()
        .try_fold(root, |node, tag| node.child(tag))
}

/// Infers the column headers from the first transaction entry: the
/// `SUBACCTFUND` column, then the tag of every direct `STMTTRN` child in
/// document order.
///
/// An empty transaction list is not valid input here. Duplicate tags in
/// the first entry's `STMTTRN` are kept as duplicate headers; during row
/// construction later same-named fields overwrite earlier ones.
pub fn column_headers(list: &Node) -> ConvertResult<Vec<String>> {
    let first = list.child(TRANSACTION_TAG)?;
    let detail = first.child(DETAIL_TAG)?;

    let mut headers = Vec::with_capacity(detail.children.len() + 1);
    headers.push(FUND_COLUMN.to_string());
    headers.extend(detail.children.iter().map(|c| c.tag.clone()));

    Ok(headers)
}

/// Builds one output row for a transaction entry, aligned to `headers`.
///
/// The `SUBACCTFUND` sibling and the `STMTTRN` sub-node are required.
/// A header with no matching field on this entry renders as an empty
/// string, same as a present-but-empty element. Strictly only the
/// schema-defining first entry is guaranteed to cover every header, so
/// the wholly-absent case could be treated as a contract violation;
/// substituting an empty string instead keeps one sparse transaction
/// from sinking the whole file.
pub fn transaction_row(entry: &Node, headers: &[String]) -> ConvertResult<Vec<String>> {
    let fund = entry.child(FUND_COLUMN)?;
    let detail = entry.child(DETAIL_TAG)?;

    let mut fields: HashMap<&str, &str> = HashMap::with_capacity(detail.children.len() + 1);
    fields.insert(FUND_COLUMN, fund.text.as_deref().unwrap_or(""));
    for child in &detail.children {
        fields.insert(child.tag.as_str(), child.text.as_deref().unwrap_or(""));
    }

    Ok(headers
        .iter()
        .map(|header| fields.get(header.as_str()).copied().unwrap_or("").to_string())
        .collect())
}
