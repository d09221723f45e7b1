//! The fake home directory behind `ls` and `cat`

/// A file in the fake home directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeFile {
    pub name: &'static str,
    pub body: &'static str,
}

pub const HOME_FILES: &[FakeFile] = &[
    FakeFile {
        name: "readme.txt",
        body: "TERMINAL HACKER\n\
\n\
Welcome to Terminal Hacker, a simulation of hacking in a terminal.\n\
\n\
Useful commands:\n\
- help: Show all available commands\n\
- scan <target>: Scan a target for vulnerabilities\n\
- connect <target>: Connect to a target\n\
- bruteforce <target>: Attempt to crack a target's password\n\
\n\
Start by typing 'targets' to see what is out there.",
    },
    FakeFile {
        name: "notes.txt",
        body: "PERSONAL NOTES\n\
\n\
Always enable stealth mode before anything loud.\n\
Once detection hits 100% the trace is complete.\n\
\n\
Todo:\n\
- Upgrade scanning tools\n\
- Research new targets\n\
- Buy a real password cracker",
    },
    FakeFile {
        name: "hacking_tools.sh",
        body: "#!/bin/bash\n\
# A collection of hacking tools\n\
\n\
echo \"Initializing hacking environment...\"\n\
echo \"Use the terminal commands instead of running this file.\"",
    },
    FakeFile {
        name: "targets.db",
        body: "DATABASE ENCRYPTED\n\
\n\
Access denied. This file requires higher privileges.\n\
Upgrade your security bypass program to read it.",
    },
];

/// Look up a file by name, ignoring case
pub fn find_file(name: &str) -> Option<&'static FakeFile> {
    HOME_FILES.iter().find(|f| f.name.eq_ignore_ascii_case(name))
}
