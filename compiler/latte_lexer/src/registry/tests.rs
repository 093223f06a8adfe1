use super::*;

#[test]
fn builtin_blocks() {
    let registry = MacroRegistry::new();
    for name in ["if", "foreach", "block", "define", "snippet", "capture", "try", "switch"] {
        assert!(registry.is_block(name, LatteVersion::V3x), "{name}");
    }
    assert_eq!(
        registry.lookup("var", LatteVersion::V3x),
        Some(MacroKind::Standalone)
    );
    assert_eq!(registry.lookup("nonexistent", LatteVersion::V3x), None);
}

#[test]
fn names_are_case_sensitive() {
    let registry = MacroRegistry::new();
    assert!(!registry.is_block("IF", LatteVersion::V3x));
    assert!(registry.is_block("snippetArea", LatteVersion::V3x));
    assert!(!registry.is_block("snippetarea", LatteVersion::V3x));
}

#[test]
fn version_gated_builtins() {
    let registry = MacroRegistry::new();
    assert!(registry.is_block("ifCurrent", LatteVersion::V2x));
    assert!(!registry.is_block("ifCurrent", LatteVersion::V3x));
    assert!(!registry.is_block("iterateWhile", LatteVersion::V2x));
    assert!(registry.is_block("iterateWhile", LatteVersion::V4x));
}

#[test]
fn custom_macros_shadow_builtins() {
    let registry = MacroRegistry::new();
    assert!(!registry.is_block("cache", LatteVersion::V3x));
    registry.configure_custom_macros([("cache", MacroKind::Block), ("if", MacroKind::Standalone)]);
    assert!(registry.is_block("cache", LatteVersion::V3x));
    assert!(!registry.is_block("if", LatteVersion::V3x));
}

#[test]
fn reconfiguring_refreshes_cached_answers() {
    let registry = MacroRegistry::new();
    registry.configure_custom_macros([("form", MacroKind::Block)]);
    assert!(registry.is_block("form", LatteVersion::V3x));

    registry.configure_custom_macros(Vec::<(String, MacroKind)>::new());
    assert!(!registry.is_block("form", LatteVersion::V3x));
}

#[test]
fn configuration_bumps_generation() {
    let registry = MacroRegistry::new();
    let start = registry.generation();
    registry.configure_custom_macros([("x", MacroKind::Block)]);
    assert_eq!(registry.generation(), start + 1);
    registry.invalidate();
    assert_eq!(registry.generation(), start + 2);
}

#[test]
fn cache_is_per_version() {
    let registry = MacroRegistry::new();
    assert!(registry.is_block("translate", LatteVersion::V3x));
    assert!(!registry.is_block("translate", LatteVersion::V2x));
    assert!(registry.is_block("translate", LatteVersion::V3x));
}

#[test]
fn shared_across_threads() {
    let registry = MacroRegistry::new();
    std::thread::scope(|scope| {
        for version in LatteVersion::ALL {
            let registry = &registry;
            scope.spawn(move || {
                for _ in 0..100 {
                    assert!(registry.is_block("foreach", version));
                }
            });
        }
        scope.spawn(|| registry.configure_custom_macros([("cache", MacroKind::Block)]));
    });
    assert!(registry.is_block("cache", LatteVersion::V3x));
}
