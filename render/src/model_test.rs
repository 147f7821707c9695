#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::api::services::{EnvSpecificDetails as ApiEnvSpecificDetails, OpenPort, ServiceDetails};
    use tfplug::types::{AttributePath, Dynamic, DynamicValue};

    fn node_service() -> Service {
        Service {
            id: "srv-1".to_string(),
            name: "api".to_string(),
            owner_id: "usr-1".to_string(),
            repo: "https://github.com/acme/api".to_string(),
            branch: "main".to_string(),
            auto_deploy: "yes".to_string(),
            root_dir: "".to_string(),
            service_type: "web_service".to_string(),
            slug: "api".to_string(),
            suspended: "not_suspended".to_string(),
            suspenders: vec![],
            image_path: "".to_string(),
            notify_on_fail: "default".to_string(),
            created_at: "2024-02-01T10:00:00Z".to_string(),
            updated_at: "2024-02-02T10:00:00Z".to_string(),
            build_filter: BuildFilter::default(),
            image: None,
            env_vars: vec![
                EnvVar {
                    key: "K1".to_string(),
                    value: "V1".to_string(),
                },
                EnvVar {
                    key: "K2".to_string(),
                    value: "V2".to_string(),
                },
                EnvVar {
                    key: "K3".to_string(),
                    value: "V3".to_string(),
                },
            ],
            secret_files: vec![
                SecretFile {
                    name: ".env".to_string(),
                    content: "A=1".to_string(),
                },
                SecretFile {
                    name: "key.pem".to_string(),
                    content: "pem".to_string(),
                },
            ],
            service_details: ServiceDetails {
                env: "node".to_string(),
                env_specific_details: ApiEnvSpecificDetails {
                    build_command: "npm ci".to_string(),
                    start_command: "npm start".to_string(),
                    ..Default::default()
                },
                health_check_path: "/healthz".to_string(),
                num_instances: 2,
                open_ports: vec![OpenPort {
                    port: 10000,
                    protocol: "TCP".to_string(),
                }],
                plan: "starter".to_string(),
                pull_request_previews_enabled: "no".to_string(),
                region: "oregon".to_string(),
                url: "https://api.onrender.com".to_string(),
                ..Default::default()
            },
        }
    }

    fn hydrated(service: &Service) -> WebServiceModel {
        let mut model = WebServiceModel::default();
        hydrate_web_service(&mut model, service);
        model
    }

    #[test]
    fn registry_accepts_only_the_three_registries() {
        for value in Registry::ALL {
            assert_eq!(value.parse::<Registry>().unwrap().as_str(), value);
        }
        for value in ["BITBUCKET", "docker", "", "QUAY"] {
            assert_eq!(
                value.parse::<Registry>(),
                Err(TranslateError::InvalidRegistry(value.to_string()))
            );
        }
    }

    #[test]
    fn env_accepts_only_known_runtimes() {
        for value in ServiceEnv::ALL {
            assert_eq!(value.parse::<ServiceEnv>().unwrap().as_str(), value);
        }
        let err = "java".parse::<ServiceEnv>().unwrap_err();
        assert!(err.to_string().ends_with("got: java"));
        assert!(ServiceEnv::Docker.is_container());
        assert!(ServiceEnv::Image.is_container());
        assert!(!ServiceEnv::Rust.is_container());
    }

    #[test]
    fn credential_request_names_the_bad_registry() {
        let model = RegistryCredentialModel {
            name: Some("asd".to_string()),
            registry: Some("BITBUCKET".to_string()),
            username: Some("ss".to_string()),
            auth_token: Some("token".to_string()),
            owner_id: Some("usr-1".to_string()),
            ..Default::default()
        };

        let err = registry_credential_request(&model).unwrap_err();
        assert_eq!(
            err.to_string(),
            "The registry value must be one of GITHUB, GITLAB, or DOCKER, got: BITBUCKET"
        );
    }

    #[test]
    fn credential_request_carries_token_from_model() {
        let model = RegistryCredentialModel {
            name: Some("asd".to_string()),
            registry: Some("DOCKER".to_string()),
            username: Some("ss".to_string()),
            auth_token: Some("dckr_pat_abc".to_string()),
            owner_id: Some("usr-1".to_string()),
            ..Default::default()
        };

        let request = registry_credential_request(&model).unwrap();
        assert_eq!(request.registry, "DOCKER");
        assert_eq!(request.auth_token, "dckr_pat_abc");
        assert_eq!(request.owner_id, "usr-1");
        assert!(!format!("{:?}", request).contains("dckr_pat_abc"));
        assert!(!request.to_string().contains("dckr_pat_abc"));
    }

    #[test]
    fn credential_hydration_leaves_owner_and_token_alone() {
        let mut model = RegistryCredentialModel {
            owner_id: Some("usr-1".to_string()),
            ..Default::default()
        };
        let credential = RegistryCredential {
            id: "rgc-cnim7h7sc6pc73d1op80".to_string(),
            name: "asd".to_string(),
            registry: "DOCKER".to_string(),
            username: "ss".to_string(),
            updated_at: "2024-02-01T10:00:00Z".to_string(),
        };

        hydrate_registry_credential(&mut model, &credential);

        assert_eq!(model.id.as_deref(), Some("rgc-cnim7h7sc6pc73d1op80"));
        assert_eq!(model.name.as_deref(), Some("asd"));
        assert_eq!(model.registry.as_deref(), Some("DOCKER"));
        assert_eq!(model.username.as_deref(), Some("ss"));
        assert_eq!(model.owner_id.as_deref(), Some("usr-1"));
        assert_eq!(model.auth_token, None);
    }

    #[test]
    fn env_vars_and_secret_files_are_stored_reversed() {
        let model = hydrated(&node_service());

        let keys: Vec<_> = model
            .environment_variables
            .unwrap()
            .into_iter()
            .map(|v| (v.key.unwrap(), v.value.unwrap()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("K3".to_string(), "V3".to_string()),
                ("K2".to_string(), "V2".to_string()),
                ("K1".to_string(), "V1".to_string()),
            ]
        );

        let files: Vec<_> = model
            .secret_files
            .unwrap()
            .into_iter()
            .map(|f| f.name.unwrap())
            .collect();
        assert_eq!(files, vec!["key.pem".to_string(), ".env".to_string()]);
    }

    #[test]
    fn disk_is_absent_without_an_id() {
        let mut service = node_service();
        service.service_details.disk = Disk {
            id: "".to_string(),
            name: "data".to_string(),
            ..Default::default()
        };

        let model = hydrated(&service);
        assert_eq!(model.service_details.unwrap().disk, None);
    }

    #[test]
    fn disk_is_present_with_an_id_and_keeps_planned_size() {
        let mut service = node_service();
        service.service_details.disk = Disk {
            id: "dsk-123".to_string(),
            name: "data".to_string(),
            mount_path: None,
            size_gb: None,
        };

        let mut model = WebServiceModel {
            service_details: Some(ServiceDetailsModel {
                disk: Some(DiskModel {
                    name: Some("data".to_string()),
                    size_gb: Some(10),
                    mount_path: Some("/var/data".to_string()),
                    id: None,
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        hydrate_web_service(&mut model, &service);

        let disk = model.service_details.unwrap().disk.unwrap();
        assert_eq!(disk.id.as_deref(), Some("dsk-123"));
        assert_eq!(disk.name.as_deref(), Some("data"));
        assert_eq!(disk.size_gb, Some(10));
        assert_eq!(disk.mount_path.as_deref(), Some("/var/data"));
    }

    #[test]
    fn autoscaling_and_parent_server_follow_their_discriminators() {
        let mut service = node_service();
        let model = hydrated(&service);
        let details = model.service_details.unwrap();
        assert_eq!(details.autoscaling, None);
        assert_eq!(details.parent_server, None);

        service.service_details.autoscaling = Autoscaling {
            enabled: true,
            min: 1,
            max: 3,
            criteria: AutoscalingCriteria {
                cpu: AutoscalingCriteriaObject {
                    enabled: true,
                    percentage: 70,
                },
                memory: AutoscalingCriteriaObject::default(),
            },
        };
        service.service_details.parent_server = ParentServer {
            id: "srv-parent".to_string(),
            name: "parent".to_string(),
        };

        let details = hydrated(&service).service_details.unwrap();
        let autoscaling = details.autoscaling.unwrap();
        assert_eq!(autoscaling.max, Some(3));
        assert_eq!(
            autoscaling.criteria.unwrap().cpu.unwrap().percentage,
            Some(70)
        );
        assert_eq!(details.parent_server.unwrap().id.as_deref(), Some("srv-parent"));
    }

    #[test]
    fn native_runtime_fills_only_native_details() {
        let details = hydrated(&node_service()).service_details.unwrap();

        assert_eq!(details.docker_details, None);
        let native = details.native_environment_details.unwrap();
        assert_eq!(native.build_command.as_deref(), Some("npm ci"));
        assert_eq!(native.start_command.as_deref(), Some("npm start"));
        assert_eq!(native.pre_deploy_command, None);
    }

    #[test]
    fn docker_runtime_fills_only_docker_details() {
        let mut service = node_service();
        service.service_details.env = "docker".to_string();
        service.service_details.env_specific_details = ApiEnvSpecificDetails {
            docker_command: "./run".to_string(),
            docker_context: ".".to_string(),
            dockerfile_path: "./Dockerfile".to_string(),
            registry_credential: RegistryCredentialRef {
                id: "rgc-1".to_string(),
                name: "hub".to_string(),
                registry: "DOCKER".to_string(),
                username: "ss".to_string(),
            },
            ..Default::default()
        };

        let details = hydrated(&service).service_details.unwrap();
        assert_eq!(details.native_environment_details, None);
        let docker = details.docker_details.clone().unwrap();
        assert_eq!(docker.dockerfile_path.as_deref(), Some("./Dockerfile"));
        assert_eq!(docker.registry_credential_id.as_deref(), Some("rgc-1"));
        assert!(matches!(
            details.env_specific_details(),
            Some(EnvSpecificDetails::Docker(_))
        ));
    }

    #[test]
    fn empty_env_specific_details_leave_both_variants_unset() {
        let mut service = node_service();
        service.service_details.env_specific_details = ApiEnvSpecificDetails::default();

        let details = hydrated(&service).service_details.unwrap();
        assert_eq!(details.env_specific_details(), None);
    }

    #[test]
    fn build_filter_is_only_replaced_when_render_returns_one() {
        let planned = BuildFilterModel {
            paths: Some(vec!["src/**".to_string()]),
            ignored_paths: None,
        };
        let mut model = WebServiceModel {
            build_filter: Some(planned.clone()),
            ..Default::default()
        };
        hydrate_web_service(&mut model, &node_service());
        assert_eq!(model.build_filter, Some(planned));

        let mut service = node_service();
        service.build_filter.ignored_paths = vec!["docs/**".to_string()];
        hydrate_web_service(&mut model, &service);
        let filter = model.build_filter.unwrap();
        assert_eq!(filter.paths, Some(vec![]));
        assert_eq!(filter.ignored_paths, Some(vec!["docs/**".to_string()]));
    }

    #[test]
    fn request_validates_env_first() {
        let model = WebServiceModel {
            service_details: Some(ServiceDetailsModel {
                env: Some("java".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };

        assert_eq!(
            web_service_request(&model),
            Err(TranslateError::InvalidEnv("java".to_string()))
        );
        assert_eq!(
            web_service_request(&WebServiceModel::default()),
            Err(TranslateError::MissingAttribute("service_details"))
        );
    }

    #[test]
    fn request_forces_web_service_type_and_keeps_list_order() {
        let model = WebServiceModel {
            name: Some("api".to_string()),
            owner_id: Some("usr-1".to_string()),
            service_type: Some("cron_job".to_string()),
            environment_variables: Some(vec![
                EnvironmentVariableModel {
                    key: Some("A".to_string()),
                    value: Some("1".to_string()),
                },
                EnvironmentVariableModel {
                    key: Some("B".to_string()),
                    value: Some("2".to_string()),
                },
            ]),
            secret_files: Some(vec![SecretFileModel {
                name: Some(".env".to_string()),
                contents: Some("A=1".to_string()),
            }]),
            service_details: Some(ServiceDetailsModel {
                env: Some("python".to_string()),
                num_instances: Some(1),
                native_environment_details: Some(NativeEnvironmentDetailsModel {
                    build_command: Some("pip install -r requirements.txt".to_string()),
                    start_command: Some("gunicorn app:app".to_string()),
                    pre_deploy_command: None,
                }),
                ..Default::default()
            }),
            ..Default::default()
        };

        let request = web_service_request(&model).unwrap();
        assert_eq!(request.service_type, "web_service");
        assert_eq!(request.env_vars[0].key, "A");
        assert_eq!(request.env_vars[1].key, "B");
        assert_eq!(request.secret_files[0].content, "A=1");
        assert_eq!(request.service_details.autoscaling, None);
        assert_eq!(request.service_details.disk, None);
        assert_eq!(request.build_filter, None);
        assert_eq!(
            request
                .service_details
                .env_specific_details
                .unwrap()
                .start_command,
            "gunicorn app:app"
        );
    }

    #[test]
    fn request_drops_native_commands_for_container_runtimes() {
        let model = WebServiceModel {
            name: Some("api".to_string()),
            owner_id: Some("usr-1".to_string()),
            service_details: Some(ServiceDetailsModel {
                env: Some("image".to_string()),
                num_instances: Some(1),
                native_environment_details: Some(NativeEnvironmentDetailsModel::default()),
                ..Default::default()
            }),
            image: Some(ImageModel {
                owner_id: Some("usr-1".to_string()),
                registry_credential_id: None,
                image_path: Some("docker.io/library/nginx:latest".to_string()),
            }),
            ..Default::default()
        };

        let request = web_service_request(&model).unwrap();
        assert_eq!(request.service_details.env_specific_details, None);
        assert_eq!(
            request.image.unwrap().image_path,
            "docker.io/library/nginx:latest"
        );
    }

    #[test]
    fn hydrate_then_request_round_trips_shared_fields() {
        let mut service = node_service();
        service.service_details.autoscaling = Autoscaling {
            enabled: true,
            min: 1,
            max: 4,
            ..Default::default()
        };
        service.service_details.disk = Disk {
            id: "dsk-1".to_string(),
            name: "data".to_string(),
            mount_path: Some("/data".to_string()),
            size_gb: Some(5),
        };
        service.build_filter.paths = vec!["src/**".to_string()];

        let model = hydrated(&service);
        let request = web_service_request(&model).unwrap();

        assert_eq!(request.name, service.name);
        assert_eq!(request.owner_id, service.owner_id);
        assert_eq!(request.repo.as_deref(), Some(service.repo.as_str()));
        assert_eq!(request.branch.as_deref(), Some(service.branch.as_str()));
        assert_eq!(request.auto_deploy.as_deref(), Some(service.auto_deploy.as_str()));
        assert_eq!(request.build_filter.as_ref(), Some(&service.build_filter));
        assert_eq!(
            request.service_details.autoscaling.as_ref(),
            Some(&service.service_details.autoscaling)
        );
        assert_eq!(request.service_details.num_instances, 2);
        assert_eq!(request.service_details.plan.as_deref(), Some("starter"));
        assert_eq!(request.service_details.region.as_deref(), Some("oregon"));
        assert_eq!(
            request.service_details.health_check_path.as_deref(),
            Some("/healthz")
        );
        let disk = request.service_details.disk.unwrap();
        assert_eq!(disk.name, "data");
        assert_eq!(disk.size_gb, Some(5));
        assert_eq!(disk.mount_path.as_deref(), Some("/data"));

        // Requests send lists in state order
        let sent: Vec<_> = request.env_vars.iter().map(|v| v.key.as_str()).collect();
        assert_eq!(sent, vec!["K3", "K2", "K1"]);
    }

    #[test]
    fn data_source_view_carries_registry_credential_and_disk_ref() {
        let mut service = node_service();
        service.service_details.env = "docker".to_string();
        service.service_details.env_specific_details = ApiEnvSpecificDetails {
            dockerfile_path: "./Dockerfile".to_string(),
            registry_credential: RegistryCredentialRef {
                id: "rgc-1".to_string(),
                name: "hub".to_string(),
                registry: "DOCKER".to_string(),
                username: "ss".to_string(),
            },
            ..Default::default()
        };
        service.service_details.disk = Disk {
            id: "dsk-1".to_string(),
            name: "data".to_string(),
            ..Default::default()
        };

        let view = service_data_source_model(&service);
        let details = view.service_details.unwrap();
        let env_details = details.env_specific_details.unwrap();
        assert_eq!(env_details.build_command.as_deref(), Some(""));
        assert_eq!(
            env_details.registry_credential.unwrap().username.as_deref(),
            Some("ss")
        );
        assert_eq!(details.disk.unwrap().id.as_deref(), Some("dsk-1"));
        assert_eq!(view.build_filter, None);
        assert_eq!(
            view.environment_variables.unwrap()[0].key.as_deref(),
            Some("K3")
        );
    }

    #[test]
    fn models_move_through_dynamic_values() {
        let model = RegistryCredentialModel {
            id: Some("rgc-1".to_string()),
            name: Some("asd".to_string()),
            registry: Some("DOCKER".to_string()),
            username: Some("ss".to_string()),
            auth_token: None,
            owner_id: Some("usr-1".to_string()),
        };

        let value = DynamicValue::from_model(&model).unwrap();
        assert!(value.is_null_at(&AttributePath::new("auth_token")));
        assert_eq!(
            value.get_string(&AttributePath::new("registry")).unwrap(),
            "DOCKER"
        );

        let mut planned = value.clone();
        planned.set(&AttributePath::new("id"), Dynamic::Unknown).unwrap();
        let decoded: RegistryCredentialModel = planned.to_model().unwrap();
        assert_eq!(decoded.id, None);
        assert_eq!(decoded.name.as_deref(), Some("asd"));
    }

    #[test]
    fn web_service_state_has_every_nested_key() {
        let value = DynamicValue::from_model(&hydrated(&node_service())).unwrap();

        let details = AttributePath::new("service_details");
        assert_eq!(
            value
                .get_number(&details.clone().attribute("num_instances"))
                .unwrap(),
            2.0
        );
        assert!(value.is_null_at(&details.clone().attribute("docker_details")));
        assert_eq!(
            value
                .get_string(
                    &details
                        .clone()
                        .attribute("native_environment_details")
                        .attribute("build_command")
                )
                .unwrap(),
            "npm ci"
        );
        assert_eq!(
            value
                .get_number(&details.attribute("open_ports").index(0).attribute("port"))
                .unwrap(),
            10000.0
        );
        assert_eq!(
            value
                .get_string(&AttributePath::new("type"))
                .unwrap(),
            "web_service"
        );
    }
}
