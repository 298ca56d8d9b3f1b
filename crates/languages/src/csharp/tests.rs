use super::*;
use crate::is_derived_from_base_type;
use pretty_assertions::assert_eq;

fn inspect(source: &str) -> Inspection {
    CSharpInspector
        .inspect(source, Path::new("Test.cs"))
        .expect("inspection should succeed")
}

#[test]
fn test_data_context_in_namespace() {
    let source = r#"
using System.Data.Entity;

namespace App.Data
{
    public class OrdersDataContext : DbContext
    {
        public DbSet<Order> Orders { get; set; }
    }
}
"#;

    let inspection = inspect(source);
    assert_eq!(
        inspection.namespace,
        Some(NamespaceScope::new("App.Data"))
    );
    assert_eq!(inspection.declarations.len(), 1);

    let declaration = &inspection.declarations[0];
    assert_eq!(declaration.name, "OrdersDataContext");
    assert_eq!(declaration.kind, DeclarationKind::Class);
    assert_eq!(declaration.base_types, vec!["DbContext".to_string()]);
    assert!(is_derived_from_base_type(&inspection.declarations, "dbcontext"));
}

#[test]
fn test_base_types_keep_written_order() {
    let source = r#"
namespace App.Data
{
    public class OrdersDataContext : System.Data.Entity.DbContext, IDisposable, IOrdersContext
    {
    }
}
"#;

    let inspection = inspect(source);
    assert_eq!(
        inspection.declarations[0].base_types,
        vec![
            "System.Data.Entity.DbContext".to_string(),
            "IDisposable".to_string(),
            "IOrdersContext".to_string(),
        ]
    );
}

#[test]
fn test_first_namespace_wins() {
    let source = r#"
namespace First.Models
{
    public class Order { }
}

namespace Second.Data
{
    public class OrdersDataContext : DbContext { }
}
"#;

    let inspection = inspect(source);
    assert_eq!(
        inspection.namespace,
        Some(NamespaceScope::new("First.Models"))
    );
    // declarations from every namespace are still collected
    let names: Vec<_> = inspection
        .declarations
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(names, vec!["Order", "OrdersDataContext"]);
}

#[test]
fn test_outer_namespace_of_nested_namespaces() {
    let source = r#"
namespace App
{
    namespace Data
    {
        public class OrdersDataContext : DbContext { }
    }
}
"#;

    let inspection = inspect(source);
    assert_eq!(inspection.namespace, Some(NamespaceScope::new("App")));
    assert_eq!(inspection.declarations.len(), 1);
    assert_eq!(inspection.declarations[0].name, "OrdersDataContext");
}

#[test]
fn test_file_scoped_namespace() {
    let source = r#"
namespace App.Data;

public class OrdersDataContext : DbContext
{
}
"#;

    let inspection = inspect(source);
    assert_eq!(
        inspection.namespace,
        Some(NamespaceScope::new("App.Data"))
    );
    assert_eq!(inspection.declarations.len(), 1);
    assert_eq!(inspection.declarations[0].base_types, vec!["DbContext"]);
}

#[test]
fn test_no_namespace() {
    let source = r#"
public class OrdersDataContext : DbContext
{
}
"#;

    let inspection = inspect(source);
    assert!(inspection.namespace.is_none());
    assert_eq!(inspection.declarations.len(), 1);
}

#[test]
fn test_nested_types_are_not_collected() {
    let source = r#"
namespace App.Data
{
    public class OrdersDataContext : DbContext
    {
        private class Inner : DbContext { }
    }
}
"#;

    let inspection = inspect(source);
    assert_eq!(inspection.declarations.len(), 1);
    assert_eq!(inspection.declarations[0].name, "OrdersDataContext");
}

#[test]
fn test_other_declaration_kinds() {
    let source = r#"
namespace App.Data
{
    public interface IOrdersContext : IDisposable { }
    public struct OrderKey { }
    public class Plain { }
}
"#;

    let inspection = inspect(source);
    let kinds: Vec<_> = inspection
        .declarations
        .iter()
        .map(|d| (d.name.as_str(), d.kind))
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("IOrdersContext", DeclarationKind::Interface),
            ("OrderKey", DeclarationKind::Struct),
            ("Plain", DeclarationKind::Class),
        ]
    );
    assert!(inspection.declarations[2].base_types.is_empty());
    assert!(!is_derived_from_base_type(&inspection.declarations, "DbContext"));
}

#[test]
fn test_generic_base_type() {
    let source = r#"
namespace App.Identity
{
    public class IdentityDataContext : IdentityDbContext<ApplicationUser> { }
}
"#;

    let inspection = inspect(source);
    assert_eq!(
        inspection.declarations[0].base_types,
        vec!["IdentityDbContext<ApplicationUser>"]
    );
    assert!(is_derived_from_base_type(
        &inspection.declarations,
        "IdentityDbContext"
    ));
}

#[test]
fn test_empty_source() {
    let inspection = inspect("");
    assert!(inspection.is_empty());
}

#[test]
fn test_declarations_inside_conditional_blocks() {
    let source = r#"
namespace App.Data
{
#if DEBUG
    public class OrdersDataContext : DbContext { }
#else
    public class ReleaseDataContext : DbContext { }
#endif
}
"#;

    let inspection = inspect(source);
    let names: Vec<_> = inspection
        .declarations
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(names, vec!["OrdersDataContext", "ReleaseDataContext"]);
    assert_eq!(inspection.namespace, Some(NamespaceScope::new("App.Data")));
    assert!(is_derived_from_base_type(&inspection.declarations, "DbContext"));
}

#[test]
fn test_comments_in_base_list_are_skipped() {
    let source = r#"
namespace App.Data
{
    public class OrdersDataContext : /* storage */ DbContext, IDisposable { }
}
"#;

    let inspection = inspect(source);
    assert_eq!(
        inspection.declarations[0].base_types,
        vec!["DbContext".to_string(), "IDisposable".to_string()]
    );
}
