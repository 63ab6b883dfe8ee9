use celltree::bindings::{
    build_g_field_sphere, build_k_field_flat, build_n_field_flat, build_n_field_sphere,
    destroy_g_field_sphere, destroy_k_field_flat, destroy_n_field_flat, destroy_n_field_sphere,
    field_cell_count, field_nobj, registry, FieldType,
};
use std::ptr;

#[test]
fn test_build_and_destroy() {
    let x = [0.0, 1.0, 2.0, 3.0];
    let y = [0.0, 0.0, 1.0, 1.0];
    let w = [1.0; 4];
    let token = unsafe {
        build_n_field_flat(x.as_ptr(), y.as_ptr(), w.as_ptr(), 4, 0.1, 100.0, 0.1, 0)
    };
    assert_ne!(token, 0);
    assert_eq!(field_nobj(token), 4);
    assert_eq!(field_cell_count(token), 1);
    assert_eq!(
        registry().get(token).unwrap().field_type(),
        FieldType::NFlat
    );

    assert_eq!(destroy_n_field_flat(token), 0);
    // Second release and later reads are rejected
    assert_eq!(destroy_n_field_flat(token), -1);
    assert_eq!(field_nobj(token), -1);
    assert_eq!(field_cell_count(token), -1);
}

#[test]
fn test_destroy_with_wrong_type() {
    let x = [0.1, 0.2];
    let y = [0.3, 0.4];
    let k = [1.0, -1.0];
    let w = [1.0, 2.0];
    let token = unsafe {
        build_k_field_flat(
            x.as_ptr(),
            y.as_ptr(),
            k.as_ptr(),
            w.as_ptr(),
            2,
            0.01,
            1.0,
            0.1,
            1,
        )
    };
    assert_ne!(token, 0);
    assert_eq!(destroy_n_field_flat(token), -1);
    assert_eq!(field_nobj(token), 2);
    assert_eq!(destroy_k_field_flat(token), 0);
}

#[test]
fn test_sphere_entry_points() {
    let ra = [0.1, 0.11, 0.12, 0.5];
    let dec = [0.2, 0.21, 0.19, -0.3];
    let g1 = [0.01, 0.02, -0.01, 0.0];
    let g2 = [0.0, 0.01, 0.02, -0.03];
    let w = [1.0; 4];

    let n = unsafe {
        build_n_field_sphere(ra.as_ptr(), dec.as_ptr(), w.as_ptr(), 4, 0.001, 1.0, 0.1, 2)
    };
    let g = unsafe {
        build_g_field_sphere(
            ra.as_ptr(),
            dec.as_ptr(),
            g1.as_ptr(),
            g2.as_ptr(),
            w.as_ptr(),
            4,
            0.001,
            1.0,
            0.1,
            3,
        )
    };
    assert!(n != 0 && g != 0 && n != g);
    assert_eq!(field_nobj(g), 4);
    assert_eq!(destroy_g_field_sphere(g), 0);
    assert_eq!(destroy_n_field_sphere(n), 0);
}

#[test]
fn test_build_failures_return_zero() {
    let x = [0.0, 1.0];
    let y = [0.0, 0.0];
    let w = [1.0, -1.0];
    unsafe {
        // Negative weight
        assert_eq!(
            build_n_field_flat(x.as_ptr(), y.as_ptr(), w.as_ptr(), 2, 0.1, 10.0, 0.1, 0),
            0
        );
        // Null pointer
        assert_eq!(
            build_n_field_flat(x.as_ptr(), ptr::null(), w.as_ptr(), 2, 0.1, 10.0, 0.1, 0),
            0
        );
        // Unknown split method
        assert_eq!(
            build_n_field_flat(x.as_ptr(), y.as_ptr(), x.as_ptr(), 2, 0.1, 10.0, 0.1, 9),
            0
        );
        // Negative count
        assert_eq!(
            build_n_field_flat(x.as_ptr(), y.as_ptr(), x.as_ptr(), -2, 0.1, 10.0, 0.1, 0),
            0
        );
        // Empty separation range
        assert_eq!(
            build_n_field_flat(x.as_ptr(), y.as_ptr(), x.as_ptr(), 2, 1.0, 1.0, 0.1, 0),
            0
        );
    }
    assert_eq!(destroy_n_field_flat(0), -1);
}
