use pet_registry::{ErrorKind, Identity, PetRegistry, RegistryConfig};
use tempfile::tempdir;

#[test]
fn records_survive_reopen() {
    let dir = tempdir().unwrap();
    let admin = Identity::derive("admin");
    let alice = Identity::derive("alice");
    let bob = Identity::derive("bob");
    let mut config = RegistryConfig::new(admin).with_storage_path(dir.path().join("db"));
    config.storage.flush_on_write = true;

    {
        let registry = PetRegistry::open(config.clone()).unwrap();
        registry.register_pet(&alice, "Buddy", 3, false).unwrap();
        registry.register_pet(&bob, "Max", 5, false).unwrap();
        registry.update_vaccination(&alice, true).unwrap();
        registry.delete_pet(&admin, &bob).unwrap();
    }

    let registry = PetRegistry::open(config).unwrap();
    assert_eq!(registry.administrator(), &admin);
    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.get_pet(&alice).unwrap().as_tuple(),
        ("Buddy", 3, true)
    );
    assert!(!registry.is_registered(&bob));
}

#[test]
fn reopening_with_other_administrator_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("db");
    let admin = Identity::derive("admin");

    drop(PetRegistry::open(RegistryConfig::new(admin).with_storage_path(&path)).unwrap());

    let err = PetRegistry::open(
        RegistryConfig::new(Identity::derive("usurper")).with_storage_path(&path),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AdministratorMismatch);
}

#[test]
fn flush_on_write_config_from_toml() {
    let dir = tempdir().unwrap();
    let admin = Identity::derive("admin");
    let user = Identity::derive("user");
    let raw = format!(
        "administrator = \"{admin}\"\n\n[storage]\npath = \"{}\"\nflush_on_write = true\n",
        dir.path().join("db").display()
    );
    let config_path = dir.path().join("registry.toml");
    std::fs::write(&config_path, raw).unwrap();

    let config = RegistryConfig::load(&config_path).unwrap();
    assert!(config.storage.flush_on_write);

    {
        let registry = PetRegistry::open(config.clone()).unwrap();
        registry.register_pet(&user, "Rex", 30, true).unwrap();
    }

    let registry = PetRegistry::open(config).unwrap();
    assert!(registry.is_registered(&user));
}
