//! XPath expression filtering
//!
//! Expressions coming from outside (requests, configuration, metadata) are
//! checked against an allow-list of axes and functions before they are
//! handed to an XPath engine. Nothing here evaluates XPath.

mod filter;
mod inventory;

pub use filter::{
    check_axes, check_functions, filter_xpath, remove_string_literals, scan_names, NameRole,
    NameToken, XPathFilter, DEFAULT_ALLOWED_AXES, DEFAULT_ALLOWED_FUNCTIONS,
};
pub use inventory::{
    is_axis, is_function, XPathAxis, CORE_FUNCTIONS, NODE_TYPE_TESTS, XSLT_FUNCTIONS,
};
