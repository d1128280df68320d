//! Page path resolution.
//!
//! Builds full URL paths ("parent/child/leaf") from per-page slugs and
//! parent references. The traversal uses an explicit worklist over an
//! id-indexed arena instead of recursion, so corrupted hierarchies (cycles,
//! orphaned parents, extreme depth) cannot overflow the stack. A page whose
//! parent chain is broken resolves as if it were a root.

use std::collections::{HashMap, HashSet};

use kyndex_core::model::PageId;

use crate::sources::PageInfo;

/// Resolve the full path of every page in `pages`.
///
/// Root pages resolve to their own slug; nested pages join their ancestor
/// slugs with `/`. Empty slugs (a site's home page) collapse rather than
/// producing double separators.
pub fn resolve_paths(pages: &[PageInfo]) -> HashMap<PageId, String> {
    let by_id: HashMap<PageId, &PageInfo> = pages.iter().map(|p| (p.page_id, p)).collect();
    let mut resolved: HashMap<PageId, String> = HashMap::with_capacity(pages.len());

    for page in pages {
        if resolved.contains_key(&page.page_id) {
            continue;
        }

        // Walk up the parent chain, collecting unresolved ancestors.
        let mut chain: Vec<PageId> = Vec::new();
        let mut on_chain: HashSet<PageId> = HashSet::new();
        let mut prefix = String::new();
        let mut current = page.page_id;

        loop {
            if let Some(known) = resolved.get(&current) {
                prefix = known.clone();
                break;
            }
            chain.push(current);
            on_chain.insert(current);

            let parent = by_id.get(&current).and_then(|info| info.parent_id);
            match parent {
                // Orphaned parents and cycles both terminate the chain;
                // the topmost collected page acts as a root.
                Some(parent_id) if by_id.contains_key(&parent_id) && !on_chain.contains(&parent_id) => {
                    current = parent_id;
                }
                _ => break,
            }
        }

        // Unwind from the topmost ancestor down, materializing paths.
        while let Some(page_id) = chain.pop() {
            let slug = by_id
                .get(&page_id)
                .map(|info| info.slug.as_str())
                .unwrap_or_default();
            let path = join_path(&prefix, slug);
            resolved.insert(page_id, path.clone());
            prefix = path;
        }
    }

    resolved
}

fn join_path(prefix: &str, slug: &str) -> String {
    match (prefix.is_empty(), slug.is_empty()) {
        (true, _) => slug.to_string(),
        (false, true) => prefix.to_string(),
        (false, false) => format!("{prefix}/{slug}"),
    }
}

// ============================================================================
// Tests
// ============================================================================
