//! Controller classes with a `show` action rendering a bundle's detail view.

use crate::codegen::merge::MethodCandidate;
use crate::codegen::skeleton::ClassSkeleton;
use crate::naming::to_camel_case;
use crate::php::ast::ArrayItem;
use crate::php::{ClassName, Expr, MethodDeclaration, Param, PhpType, Stmt};
use crate::resolver::ClassLocation;

/// A new controller class extending `base`.
pub fn controller_skeleton(location: &ClassLocation, base: &ClassName) -> ClassSkeleton {
    ClassSkeleton::generated(location, Some(base))
}

/// `show(<Model> $<bundle>)` returning
/// `$this->view('<entity_type>.<bundle>.detail', ['<bundle>' => $<bundle>])`.
pub fn show_action(entity_type: &str, bundle: &str, model: &ClassName) -> MethodCandidate {
    let variable = to_camel_case(bundle);

    let mut method = MethodDeclaration::public("show");
    method.params = vec![Param::typed(PhpType::Class(model.clone()), variable.clone())];
    method.body = vec![Stmt::Return(Some(Expr::This.call(
        "view",
        vec![
            Expr::str(format!("{}.{}.detail", entity_type, bundle)),
            Expr::Array(vec![ArrayItem {
                key: Some(Expr::str(variable.clone())),
                value: Expr::var(variable),
            }]),
        ],
    )))];

    MethodCandidate::new(format!("{}.{}", entity_type, bundle), method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::merge_methods;
    use crate::php::PhpParser;
    use crate::resolver::ClassPathResolver;

    #[test]
    fn test_renders_show_action() {
        let resolver = ClassPathResolver::new("my_module", "/tmp/my_module");
        let location = resolver.controller_location("node", "blog_post");
        let model = resolver.model_location("node", "blog_post").class;
        let base = ClassName::new("Drupal\\wmcontroller\\Controller\\ControllerBase");

        let skeleton = controller_skeleton(&location, &base);
        let mut parser = PhpParser::new().unwrap();
        let (merged, report) =
            merge_methods(&skeleton, &[show_action("node", "blog_post", &model)], &mut parser).unwrap();
        assert_eq!(report.added, vec!["show".to_string()]);

        assert_eq!(
            merged.render(),
            "<?php\n\nnamespace Drupal\\my_module\\Controller\\Node;\n\nuse Drupal\\my_module\\Entity\\Node\\BlogPost;\nuse Drupal\\wmcontroller\\Controller\\ControllerBase;\n\nclass BlogPostController extends ControllerBase\n{\n    public function show(BlogPost $blogPost)\n    {\n        return $this->view('node.blog_post.detail', ['blogPost' => $blogPost]);\n    }\n}\n"
        );
    }
}
