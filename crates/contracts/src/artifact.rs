//! Loading of compiled contracts.
//!
//! Both Hardhat (`artifacts/contracts/Foo.sol/Foo.json`, bytecode as a hex
//! string) and Foundry (`out/Foo.sol/Foo.json`, bytecode as an object) layouts
//! are supported. Artifacts are looked up by contract name anywhere below the
//! configured root directory.

use {
    alloy::{json_abi::ContractObject, primitives::Bytes, sol_types::SolConstructor},
    anyhow::{Context, Result},
    std::{fs, path::PathBuf},
};

#[derive(Debug, Clone)]
pub struct Artifacts {
    root: PathBuf,
}

impl Artifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the creation bytecode of the named contract.
    pub fn bytecode(&self, name: &str) -> Result<Bytes> {
        let path = self.find(name)?;
        let data = fs::read_to_string(&path)
            .with_context(|| format!("I/O error while reading {path:?}"))?;
        let contract: ContractObject = serde_json::from_str(&data).with_context(|| {
            format!("{path:?} is not a contract artifact (libraries must be linked beforehand)")
        })?;
        contract
            .bytecode
            .filter(|bytecode| !bytecode.is_empty())
            .with_context(|| format!("{path:?} has no creation bytecode (abstract contract?)"))
    }

    /// Returns the deployment transaction input for the named contract: its
    /// creation bytecode followed by the ABI encoded constructor arguments.
    pub fn deploy_code<C: SolConstructor>(&self, name: &str, constructor: &C) -> Result<Bytes> {
        let mut code = self.bytecode(name)?.to_vec();
        code.extend(constructor.abi_encode());
        Ok(code.into())
    }

    /// The artifact must be unique below the root, otherwise which bytecode
    /// gets deployed would depend on directory listing order.
    fn find(&self, name: &str) -> Result<PathBuf> {
        let file_name = format!("{name}.json");
        let mut found = Vec::new();
        let mut pending = vec![self.root.clone()];
        while let Some(dir) = pending.pop() {
            let entries =
                fs::read_dir(&dir).with_context(|| format!("cannot list directory {dir:?}"))?;
            for entry in entries {
                let path = entry?.path();
                if path.is_dir() {
                    pending.push(path);
                } else if path.file_name().is_some_and(|file| file == file_name.as_str()) {
                    found.push(path);
                }
            }
        }

        match found.len() {
            0 => anyhow::bail!("no artifact for contract {name} below {:?}", self.root),
            1 => Ok(found.remove(0)),
            _ => {
                found.sort();
                anyhow::bail!("ambiguous artifacts for contract {name}: {found:?}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::alloy::{SwapRouter, TestToken},
        alloy::primitives::address,
        hex_literal::hex,
        std::path::Path,
    };

    fn write(root: &Path, relative: &str, contents: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn loads_nested_hardhat_artifact() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "contracts/test/TestToken.sol/TestToken.dbg.json",
            r#"{"_format": "hh-sol-dbg-1", "buildInfo": "../../build-info/x.json"}"#,
        );
        write(
            dir.path(),
            "contracts/test/TestToken.sol/TestToken.json",
            r#"{
                "_format": "hh-sol-artifact-1",
                "contractName": "TestToken",
                "abi": [],
                "bytecode": "0x6080604052",
                "deployedBytecode": "0x6080"
            }"#,
        );

        let artifacts = Artifacts::new(dir.path());
        assert_eq!(
            artifacts.bytecode("TestToken").unwrap(),
            Bytes::from(hex!("6080604052"))
        );
    }

    #[test]
    fn loads_foundry_artifact() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "SwapRouter.sol/SwapRouter.json",
            r#"{
                "abi": [],
                "bytecode": { "object": "0x60016002", "linkReferences": {} },
                "deployedBytecode": { "object": "0x6001", "linkReferences": {} }
            }"#,
        );

        let artifacts = Artifacts::new(dir.path());
        let code = artifacts
            .deploy_code(
                "SwapRouter",
                &SwapRouter::SwapRouter::constructorCall {
                    factory: address!("0x1111111111111111111111111111111111111111"),
                    WETH9: address!("0x2222222222222222222222222222222222222222"),
                },
            )
            .unwrap();

        assert_eq!(&code[..4], hex!("60016002").as_slice());
        assert_eq!(code.len(), 4 + 2 * 32);
        assert_eq!(&code[4 + 12..4 + 32], [0x11; 20].as_slice());
        assert_eq!(&code[4 + 44..], [0x22; 20].as_slice());
    }

    #[test]
    fn constructor_arguments_use_dynamic_encoding() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "TestToken.json",
            r#"{"abi": [], "bytecode": "0x00"}"#,
        );

        let code = Artifacts::new(dir.path())
            .deploy_code(
                "TestToken",
                &TestToken::TestToken::constructorCall {
                    name: "a".into(),
                    symbol: "a".into(),
                    decimals: 18,
                },
            )
            .unwrap();

        // head: two string offsets and the decimals, tail: two (length, data) pairs
        assert_eq!(code.len(), 1 + 3 * 32 + 2 * 2 * 32);
        assert_eq!(code[1 + 3 * 32 - 1], 18);
    }

    #[test]
    fn missing_or_empty_artifacts_are_errors() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "Abstract.json", r#"{"abi": [], "bytecode": "0x"}"#);
        write(
            dir.path(),
            "Unlinked.json",
            r#"{"abi": [], "bytecode": "0x73__$a0b1c2d3e4f5a6b7c8d9e0f1a2b3c4d5e6$__"}"#,
        );

        let artifacts = Artifacts::new(dir.path());
        assert!(artifacts.bytecode("Missing").is_err());
        assert!(artifacts.bytecode("Abstract").is_err());
        assert!(artifacts.bytecode("Unlinked").is_err());
    }

    #[test]
    fn duplicate_artifacts_are_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = r#"{"abi": [], "bytecode": "0x6001"}"#;
        write(dir.path(), "artifacts/TestToken.sol/TestToken.json", artifact);
        write(dir.path(), "out/TestToken.sol/TestToken.json", artifact);

        let err = Artifacts::new(dir.path()).bytecode("TestToken").unwrap_err();
        assert!(err.to_string().contains("ambiguous artifacts for contract TestToken"));

        // A single copy below a more specific root is fine.
        let artifacts = Artifacts::new(dir.path().join("out"));
        assert_eq!(artifacts.bytecode("TestToken").unwrap(), Bytes::from(hex!("6001")));
    }
}
