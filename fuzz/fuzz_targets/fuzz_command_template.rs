#![no_main]

use hwcheck_core::coordination::Project;
use hwcheck_core::language::BUILTIN_PROFILES;
use hwcheck_core::platform::PathUtil;
use libfuzzer_sys::fuzz_target;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let files: Vec<String> = text
        .lines()
        .filter(|l| !l.is_empty())
        .take(16)
        .map(str::to_string)
        .collect();
    let Some(entry) = files.first() else {
        return;
    };

    for profile in BUILTIN_PROFILES {
        let project = Project::new(profile, Path::new("/repo"), entry, &files);
        let output = Path::new("/build/student_executable");
        let ctx = project.command_context(output);

        let run = profile.run.resolve(&ctx);
        assert!(!run.is_empty());

        if let Some(compile) = profile.compile {
            // Compiler name plus at least one argument per source
            let line = compile.resolve(&ctx);
            assert!(line.len() > files.len());
        }

        let _ = PathUtil::stem(entry);
    }
});
