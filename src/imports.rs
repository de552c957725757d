//! Import reconciliation for rewritten files.
//!
//! After a rewrite, a file references symbols it may not import yet. This
//! module ensures the file's import statements reflect the requirement:
//!
//! - an existing `import { … } from '<module path>'` statement for the same
//!   module is merged in place: order-preserving set union, missing symbols
//!   appended in the order the rule lists them;
//! - otherwise a new import line is inserted directly after the last line
//!   that begins an import statement;
//! - a file with no import statements gets the new import as its first line.
//!
//! After reconciliation at most one import statement exists per module path
//! and its symbol list holds no duplicates.

use std::path::Path;

use regex::Regex;

use crate::error::RefitError;

// ============================================================================
// Relative Module Path
// ============================================================================

/// Compute the import path from a file's location to a module below the
/// source root.
///
/// A file directly in the root imports `./<module>`; a file two levels down
/// imports `../../<module>`. The file must live under `source_root`.
pub fn module_path_for(file: &Path, source_root: &Path, module: &str) -> Result<String, RefitError> {
    let parent = file.parent().unwrap_or(source_root);
    let relative = parent.strip_prefix(source_root).map_err(|_| {
        RefitError::internal(format!(
            "file {} is not under source root {}",
            file.display(),
            source_root.display()
        ))
    })?;

    let depth = relative.components().count();
    if depth == 0 {
        Ok(format!("./{}", module))
    } else {
        Ok(format!("{}{}", "../".repeat(depth), module))
    }
}

// ============================================================================
// Reconciliation
// ============================================================================

/// Render an import statement for a symbol list and module path.
fn render_import(symbols: &[String], module_path: &str) -> String {
    format!("import {{ {} }} from '{}';", symbols.join(", "), module_path)
}

/// Regex matching an existing named-import statement for the module path.
fn existing_import_pattern(module_path: &str) -> Result<Regex, RefitError> {
    let pattern = format!(
        r#"import\s+\{{([^}}]+)\}}\s+from\s+['"]{}['"];?"#,
        regex::escape(module_path)
    );
    Regex::new(&pattern)
        .map_err(|e| RefitError::internal(format!("bad import pattern: {}", e)))
}

/// Ensure `content` imports `required_symbols` from `module_path`.
pub fn reconcile(
    content: &str,
    required_symbols: &[String],
    module_path: &str,
) -> Result<String, RefitError> {
    let pattern = existing_import_pattern(module_path)?;

    if let Some(found) = pattern.captures(content) {
        // Merge: union of existing and required names, original order
        // preserved, new symbols appended in rule order.
        let mut symbols: Vec<String> = found[1]
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        for required in required_symbols {
            if !symbols.iter().any(|s| s == required) {
                symbols.push(required.clone());
            }
        }

        let statement = found.get(0).expect("capture 0 always present");
        let mut merged = String::with_capacity(content.len());
        merged.push_str(&content[..statement.start()]);
        merged.push_str(&render_import(&symbols, module_path));
        merged.push_str(&content[statement.end()..]);
        return Ok(merged);
    }

    // No statement for this module yet: insert a fresh one after the last
    // line that begins an import, or at the top of an import-free file.
    let new_import = render_import(required_symbols, module_path);
    let mut lines: Vec<&str> = content.split('\n').collect();

    let last_import = lines
        .iter()
        .rposition(|line| line.starts_with("import "));

    match last_import {
        Some(idx) => lines.insert(idx + 1, &new_import),
        None => lines.insert(0, &new_import),
    }

    Ok(lines.join("\n"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn symbols(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    mod relative_paths {
        use super::*;

        #[test]
        fn depth_zero_uses_same_directory_form() {
            let root = PathBuf::from("/app/frontend/src");
            let file = root.join("App.tsx");
            assert_eq!(
                module_path_for(&file, &root, "utils/imageUtils").unwrap(),
                "./utils/imageUtils"
            );
        }

        #[test]
        fn depth_one_steps_up_once() {
            let root = PathBuf::from("/app/frontend/src");
            let file = root.join("components/Avatar.tsx");
            assert_eq!(
                module_path_for(&file, &root, "utils/imageUtils").unwrap(),
                "../utils/imageUtils"
            );
        }

        #[test]
        fn depth_two_steps_up_twice() {
            let root = PathBuf::from("/app/frontend/src");
            let file = root.join("pages/admin/Users.tsx");
            assert_eq!(
                module_path_for(&file, &root, "utils/imageUtils").unwrap(),
                "../../utils/imageUtils"
            );
        }

        #[test]
        fn file_outside_root_is_internal_error() {
            let root = PathBuf::from("/app/frontend/src");
            let file = PathBuf::from("/elsewhere/App.tsx");
            let err = module_path_for(&file, &root, "utils/imageUtils").unwrap_err();
            assert_eq!(err.error_code().code(), 10);
        }
    }

    mod merge_into_existing {
        use super::*;

        #[test]
        fn union_preserves_order_and_appends_missing() {
            let content = "import { A, B } from './utils/imageUtils';\nrest();\n";
            let out = reconcile(content, &symbols(&["B", "C"]), "./utils/imageUtils").unwrap();
            assert_eq!(
                out,
                "import { A, B, C } from './utils/imageUtils';\nrest();\n"
            );
        }

        #[test]
        fn exact_existing_import_is_untouched() {
            let content =
                "import { DEFAULT_AVATAR, handleImageError } from '../utils/imageUtils';\n";
            let out = reconcile(
                content,
                &symbols(&["DEFAULT_AVATAR", "handleImageError"]),
                "../utils/imageUtils",
            )
            .unwrap();
            assert_eq!(out, content);
        }

        #[test]
        fn double_quoted_import_is_found_and_normalized() {
            let content = "import {A} from \"./utils/imageUtils\"\nrest();\n";
            let out = reconcile(content, &symbols(&["B"]), "./utils/imageUtils").unwrap();
            assert_eq!(out, "import { A, B } from './utils/imageUtils';\nrest();\n");
        }

        #[test]
        fn other_modules_are_not_merged_into() {
            let content = "import { A } from './utils/other';\nrest();\n";
            let out = reconcile(content, &symbols(&["B"]), "./utils/imageUtils").unwrap();
            // A fresh import is inserted; the unrelated one stays.
            assert!(out.contains("import { A } from './utils/other';"));
            assert!(out.contains("import { B } from './utils/imageUtils';"));
        }

        #[test]
        fn result_has_single_import_for_module() {
            let content = "import { A } from '../utils/imageUtils';\nbody();\n";
            let out = reconcile(content, &symbols(&["B", "C"]), "../utils/imageUtils").unwrap();
            assert_eq!(out.matches("utils/imageUtils").count(), 1);
        }
    }

    mod insert_new {
        use super::*;

        #[test]
        fn inserted_after_last_import_line() {
            let content = "import React from 'react';\nimport { Box } from './Box';\n\nexport const X = 1;\n";
            let out = reconcile(content, &symbols(&["SYM"]), "./utils/imageUtils").unwrap();
            let expected = "import React from 'react';\nimport { Box } from './Box';\nimport { SYM } from './utils/imageUtils';\n\nexport const X = 1;\n";
            assert_eq!(out, expected);
        }

        #[test]
        fn file_without_imports_gets_import_at_top() {
            let content = "export const X = 1;\n";
            let out = reconcile(content, &symbols(&["SYM"]), "./utils/imageUtils").unwrap();
            assert_eq!(
                out,
                "import { SYM } from './utils/imageUtils';\nexport const X = 1;\n"
            );
        }

        #[test]
        fn indented_import_does_not_count_as_last_import() {
            // Only lines that begin an import statement anchor insertion.
            let content = "import A from 'a';\nconst s = `\n  import fake from 'x';\n`;\n";
            let out = reconcile(content, &symbols(&["SYM"]), "./m").unwrap();
            let lines: Vec<&str> = out.split('\n').collect();
            assert_eq!(lines[0], "import A from 'a';");
            assert_eq!(lines[1], "import { SYM } from './m';");
        }
    }
}
